//! AutoScalingGroup - The umbrella construct
//!
//! Declares a group and its instance configuration, accumulates scaling
//! behavior (policies, schedules, hooks, warm pool), and renders the
//! whole family of resources into a template in one validated step.

use cirrus_core::duration::Duration;
use cirrus_core::expr::StringExpr;
use cirrus_core::resource::LogicalId;
use cirrus_core::template::Template;

use crate::cfn::alarm::CfnAlarm;
use crate::cfn::auto_scaling_group::{
    CfnAutoScalingGroup, MetricsCollection, NotificationConfiguration, TagProperty,
};
use crate::cfn::launch_configuration::CfnLaunchConfiguration;
use crate::cfn::lifecycle_hook::CfnLifecycleHook;
use crate::cfn::scaling_policy::CfnScalingPolicy;
use crate::cfn::scheduled_action::CfnScheduledAction;
use crate::cfn::warm_pool::CfnWarmPool;
use crate::types::{
    GroupMetric, HealthCheckType, Monitoring, PredefinedMetricType, ScalingEvent,
    TerminationPolicy,
};

use super::AutoScalingError;
use super::lifecycle_hook::LifecycleHookProps;
use super::scheduled_action::ScheduledScalingProps;
use super::signals::Signals;
use super::step_scaling_policy::{StepScalingPolicy, StepScalingProps};
use super::target_tracking::{
    CustomMetric, TargetTrackingOptions, custom_metric_policy, predefined_metric_policy,
};
use super::update_policy::UpdatePolicy;
use super::volume::{BlockDevice, render_block_devices};
use super::warm_pool::WarmPoolOptions;

/// Shortest allowed instance lifetime, one day in seconds
const MIN_INSTANCE_LIFETIME_SECS: u64 = 86_400;
/// Longest allowed instance lifetime, 365 days in seconds
const MAX_INSTANCE_LIFETIME_SECS: u64 = 31_536_000;

/// Health check source and grace period
#[derive(Debug, Clone, PartialEq)]
pub struct HealthCheck {
    pub check_type: HealthCheckType,
    pub grace_period: Option<Duration>,
}

impl HealthCheck {
    pub fn ec2() -> Self {
        Self {
            check_type: HealthCheckType::Ec2,
            grace_period: None,
        }
    }

    pub fn elb(grace_period: Duration) -> Self {
        Self {
            check_type: HealthCheckType::Elb,
            grace_period: Some(grace_period),
        }
    }

    pub fn with_grace_period(mut self, grace_period: Duration) -> Self {
        self.grace_period = Some(grace_period);
        self
    }
}

/// SNS topic to notify about group events; an empty event list means all
/// launch and terminate events
#[derive(Debug, Clone, PartialEq)]
pub struct GroupNotification {
    pub topic_arn: StringExpr,
    pub events: Vec<ScalingEvent>,
}

impl GroupNotification {
    pub fn new(topic_arn: impl Into<StringExpr>) -> Self {
        Self {
            topic_arn: topic_arn.into(),
            events: Vec::new(),
        }
    }

    pub fn with_event(mut self, event: ScalingEvent) -> Self {
        self.events.push(event);
        self
    }

    fn event_types(&self) -> Vec<String> {
        let events = if self.events.is_empty() {
            vec![
                ScalingEvent::InstanceLaunch,
                ScalingEvent::InstanceLaunchError,
                ScalingEvent::InstanceTerminate,
                ScalingEvent::InstanceTerminateError,
            ]
        } else {
            self.events.clone()
        };
        events.iter().map(|e| e.as_str().to_string()).collect()
    }
}

/// An auto scaling group plus everything it launches and triggers
#[derive(Debug, Clone)]
pub struct AutoScalingGroup {
    name: String,
    logical_id: LogicalId,
    image_id: String,
    instance_type: String,
    min_capacity: u32,
    max_capacity: u32,
    desired_capacity: Option<u32>,
    key_name: Option<String>,
    security_groups: Vec<StringExpr>,
    iam_instance_profile: Option<StringExpr>,
    user_data: Option<String>,
    spot_price: Option<String>,
    associate_public_ip_address: Option<bool>,
    monitoring: Option<Monitoring>,
    block_devices: Vec<BlockDevice>,
    subnets: Vec<String>,
    availability_zones: Vec<String>,
    cooldown: Option<Duration>,
    health_check: Option<HealthCheck>,
    max_instance_lifetime: Option<Duration>,
    new_instances_protected: Option<bool>,
    capacity_rebalance: Option<bool>,
    group_metrics: Vec<GroupMetric>,
    termination_policies: Vec<TerminationPolicy>,
    target_group_arns: Vec<String>,
    load_balancer_names: Vec<String>,
    notifications: Vec<GroupNotification>,
    tags: Vec<TagProperty>,
    signals: Option<Signals>,
    update_policy: Option<UpdatePolicy>,
    policies: Vec<(LogicalId, CfnScalingPolicy)>,
    alarms: Vec<(LogicalId, CfnAlarm)>,
    lifecycle_hooks: Vec<(LogicalId, CfnLifecycleHook)>,
    scheduled_actions: Vec<(LogicalId, CfnScheduledAction)>,
    warm_pool: Option<(LogicalId, CfnWarmPool)>,
}

impl AutoScalingGroup {
    /// A group of one instance until capacity is configured
    pub fn new(
        name: impl Into<String>,
        image_id: impl Into<String>,
        instance_type: impl Into<String>,
    ) -> Self {
        let name = name.into();
        let logical_id = LogicalId::from_name(&name);
        Self {
            name,
            logical_id,
            image_id: image_id.into(),
            instance_type: instance_type.into(),
            min_capacity: 1,
            max_capacity: 1,
            desired_capacity: None,
            key_name: None,
            security_groups: Vec::new(),
            iam_instance_profile: None,
            user_data: None,
            spot_price: None,
            associate_public_ip_address: None,
            monitoring: None,
            block_devices: Vec::new(),
            subnets: Vec::new(),
            availability_zones: Vec::new(),
            cooldown: None,
            health_check: None,
            max_instance_lifetime: None,
            new_instances_protected: None,
            capacity_rebalance: None,
            group_metrics: Vec::new(),
            termination_policies: Vec::new(),
            target_group_arns: Vec::new(),
            load_balancer_names: Vec::new(),
            notifications: Vec::new(),
            tags: Vec::new(),
            signals: None,
            update_policy: None,
            policies: Vec::new(),
            alarms: Vec::new(),
            lifecycle_hooks: Vec::new(),
            scheduled_actions: Vec::new(),
            warm_pool: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Logical ID the group will occupy in the template
    pub fn logical_id(&self) -> &LogicalId {
        &self.logical_id
    }

    /// Expression other resources use to name this group
    pub fn group_name_expr(&self) -> StringExpr {
        StringExpr::reference(&self.logical_id)
    }

    pub fn with_capacity(mut self, min: u32, max: u32) -> Self {
        self.min_capacity = min;
        self.max_capacity = max;
        self
    }

    pub fn with_desired_capacity(mut self, desired: u32) -> Self {
        self.desired_capacity = Some(desired);
        self
    }

    pub fn with_key_name(mut self, key_name: impl Into<String>) -> Self {
        self.key_name = Some(key_name.into());
        self
    }

    pub fn with_security_group(mut self, group: impl Into<StringExpr>) -> Self {
        self.security_groups.push(group.into());
        self
    }

    pub fn with_iam_instance_profile(mut self, profile: impl Into<StringExpr>) -> Self {
        self.iam_instance_profile = Some(profile.into());
        self
    }

    pub fn with_user_data(mut self, user_data: impl Into<String>) -> Self {
        self.user_data = Some(user_data.into());
        self
    }

    pub fn with_spot_price(mut self, price: impl Into<String>) -> Self {
        self.spot_price = Some(price.into());
        self
    }

    pub fn with_associate_public_ip_address(mut self, associate: bool) -> Self {
        self.associate_public_ip_address = Some(associate);
        self
    }

    pub fn with_monitoring(mut self, monitoring: Monitoring) -> Self {
        self.monitoring = Some(monitoring);
        self
    }

    pub fn with_block_device(mut self, device: BlockDevice) -> Self {
        self.block_devices.push(device);
        self
    }

    pub fn with_subnets(mut self, subnets: Vec<String>) -> Self {
        self.subnets = subnets;
        self
    }

    pub fn with_availability_zones(mut self, zones: Vec<String>) -> Self {
        self.availability_zones = zones;
        self
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = Some(cooldown);
        self
    }

    pub fn with_health_check(mut self, health_check: HealthCheck) -> Self {
        self.health_check = Some(health_check);
        self
    }

    pub fn with_max_instance_lifetime(mut self, lifetime: Duration) -> Self {
        self.max_instance_lifetime = Some(lifetime);
        self
    }

    pub fn with_scale_in_protection(mut self, protected: bool) -> Self {
        self.new_instances_protected = Some(protected);
        self
    }

    pub fn with_capacity_rebalance(mut self, enabled: bool) -> Self {
        self.capacity_rebalance = Some(enabled);
        self
    }

    pub fn with_group_metrics(mut self, metrics: Vec<GroupMetric>) -> Self {
        self.group_metrics = metrics;
        self
    }

    pub fn with_termination_policies(mut self, policies: Vec<TerminationPolicy>) -> Self {
        self.termination_policies = policies;
        self
    }

    pub fn with_target_group_arn(mut self, arn: impl Into<String>) -> Self {
        self.target_group_arns.push(arn.into());
        self
    }

    pub fn with_load_balancer_name(mut self, name: impl Into<String>) -> Self {
        self.load_balancer_names.push(name.into());
        self
    }

    pub fn with_notification(mut self, notification: GroupNotification) -> Self {
        self.notifications.push(notification);
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.push(TagProperty {
            key: key.into(),
            value: value.into(),
            propagate_at_launch: true,
        });
        self
    }

    pub fn with_signals(mut self, signals: Signals) -> Self {
        self.signals = Some(signals);
        self
    }

    pub fn with_update_policy(mut self, policy: UpdatePolicy) -> Self {
        self.update_policy = Some(policy);
        self
    }

    /// Keep average CPU utilization at the target percentage
    pub fn scale_on_cpu_utilization(
        &mut self,
        id: &str,
        target_utilization_percent: f64,
        options: TargetTrackingOptions,
    ) {
        self.add_target_tracking(
            id,
            PredefinedMetricType::AverageCpuUtilization,
            target_utilization_percent,
            None,
            options,
        );
    }

    /// Keep average inbound traffic at the target bytes per second
    pub fn scale_on_incoming_bytes(
        &mut self,
        id: &str,
        target_bytes_per_second: f64,
        options: TargetTrackingOptions,
    ) {
        self.add_target_tracking(
            id,
            PredefinedMetricType::AverageNetworkIn,
            target_bytes_per_second,
            None,
            options,
        );
    }

    /// Keep average outbound traffic at the target bytes per second
    pub fn scale_on_outgoing_bytes(
        &mut self,
        id: &str,
        target_bytes_per_second: f64,
        options: TargetTrackingOptions,
    ) {
        self.add_target_tracking(
            id,
            PredefinedMetricType::AverageNetworkOut,
            target_bytes_per_second,
            None,
            options,
        );
    }

    /// Keep ALB requests per target at the target rate
    ///
    /// `resource_label` identifies the load balancer and target group,
    /// in the `app/<lb>/<id>/targetgroup/<tg>/<id>` form the metric needs.
    pub fn scale_on_request_count(
        &mut self,
        id: &str,
        target_requests_per_target: f64,
        resource_label: impl Into<String>,
        options: TargetTrackingOptions,
    ) {
        self.add_target_tracking(
            id,
            PredefinedMetricType::AlbRequestCountPerTarget,
            target_requests_per_target,
            Some(resource_label.into()),
            options,
        );
    }

    /// Keep a customized CloudWatch metric at the target value
    pub fn scale_to_track_metric(
        &mut self,
        id: &str,
        metric: CustomMetric,
        target_value: f64,
        options: TargetTrackingOptions,
    ) {
        let policy = custom_metric_policy(self.group_name_expr(), metric, target_value, &options);
        self.policies.push((self.logical_id.child(id), policy));
    }

    /// Scale in steps driven by a metric's intervals
    ///
    /// When the metric carries no dimensions it is scoped to this group.
    pub fn scale_on_metric(
        &mut self,
        id: &str,
        mut props: StepScalingProps,
    ) -> Result<(), AutoScalingError> {
        if props.metric.dimensions.is_empty() {
            props.metric.dimensions.push((
                "AutoScalingGroupName".to_string(),
                self.group_name_expr(),
            ));
        }

        let base_id = self.logical_id.child(id);
        let rendered = StepScalingPolicy::new(&base_id, self.group_name_expr(), &props)?;
        for entry in [rendered.lower_policy, rendered.upper_policy].into_iter().flatten() {
            self.policies.push(entry);
        }
        for entry in [rendered.lower_alarm, rendered.upper_alarm].into_iter().flatten() {
            self.alarms.push(entry);
        }
        Ok(())
    }

    /// Change capacity on a schedule
    pub fn scale_on_schedule(
        &mut self,
        id: &str,
        props: ScheduledScalingProps,
    ) -> Result<(), AutoScalingError> {
        let action = props.render(self.group_name_expr(), id)?;
        self.scheduled_actions.push((self.logical_id.child(id), action));
        Ok(())
    }

    /// Pause instances during launch or termination
    pub fn add_lifecycle_hook(
        &mut self,
        id: &str,
        props: LifecycleHookProps,
    ) -> Result<(), AutoScalingError> {
        let hook = props.render(self.group_name_expr(), id)?;
        self.lifecycle_hooks.push((self.logical_id.child(id), hook));
        Ok(())
    }

    /// Keep a pool of pre-initialized instances next to the group
    pub fn add_warm_pool(&mut self, options: WarmPoolOptions) -> Result<(), AutoScalingError> {
        if self.warm_pool.is_some() {
            return Err(AutoScalingError::validation(format!(
                "group '{}' already has a warm pool",
                self.name
            )));
        }
        let pool = options.render(self.group_name_expr())?;
        self.warm_pool = Some((self.logical_id.child("warm-pool"), pool));
        Ok(())
    }

    fn add_target_tracking(
        &mut self,
        id: &str,
        metric: PredefinedMetricType,
        target_value: f64,
        resource_label: Option<String>,
        options: TargetTrackingOptions,
    ) {
        let policy = predefined_metric_policy(
            self.group_name_expr(),
            metric,
            target_value,
            resource_label,
            &options,
        );
        self.policies.push((self.logical_id.child(id), policy));
    }

    fn validate(&self) -> Result<(), AutoScalingError> {
        if self.min_capacity > self.max_capacity {
            return Err(AutoScalingError::validation(format!(
                "group '{}': min capacity {} exceeds max capacity {}",
                self.name, self.min_capacity, self.max_capacity
            )));
        }
        if let Some(desired) = self.desired_capacity
            && !(self.min_capacity..=self.max_capacity).contains(&desired)
        {
            return Err(AutoScalingError::validation(format!(
                "group '{}': desired capacity {} is outside [{}, {}]",
                self.name, desired, self.min_capacity, self.max_capacity
            )));
        }
        if let Some(lifetime) = self.max_instance_lifetime {
            let secs = lifetime.as_secs();
            if !(MIN_INSTANCE_LIFETIME_SECS..=MAX_INSTANCE_LIFETIME_SECS).contains(&secs) {
                return Err(AutoScalingError::validation(format!(
                    "group '{}': max instance lifetime must be between 1 and 365 days",
                    self.name
                )));
            }
        }
        if let Some(signals) = &self.signals
            && let Some(percentage) = signals.min_success_percentage()
            && percentage > 100
        {
            return Err(AutoScalingError::validation(format!(
                "group '{}': signal success percentage {} exceeds 100",
                self.name, percentage
            )));
        }
        Ok(())
    }

    fn render_launch_configuration(&self) -> Result<CfnLaunchConfiguration, AutoScalingError> {
        let mut config = CfnLaunchConfiguration::new(&self.image_id, &self.instance_type);
        if let Some(key_name) = &self.key_name {
            config = config.with_key_name(key_name.clone());
        }
        for group in &self.security_groups {
            config = config.with_security_group(group.clone());
        }
        if let Some(profile) = &self.iam_instance_profile {
            config = config.with_iam_instance_profile(profile.clone());
        }
        if let Some(user_data) = &self.user_data {
            config = config.with_user_data(user_data.clone());
        }
        if let Some(price) = &self.spot_price {
            config = config.with_spot_price(price.clone());
        }
        if let Some(associate) = self.associate_public_ip_address {
            config = config.with_associate_public_ip_address(associate);
        }
        if let Some(monitoring) = self.monitoring {
            config = config.with_instance_monitoring(monitoring.enabled());
        }
        for mapping in render_block_devices(&self.block_devices)? {
            config = config.with_block_device_mapping(mapping);
        }
        Ok(config)
    }

    fn render_group(&self, launch_config_id: &LogicalId) -> CfnAutoScalingGroup {
        let mut group = CfnAutoScalingGroup::new(self.min_capacity, self.max_capacity)
            .with_launch_configuration_name(StringExpr::reference(launch_config_id))
            .with_vpc_zone_identifier(self.subnets.clone())
            .with_availability_zones(self.availability_zones.clone())
            .with_termination_policies(self.termination_policies.clone())
            .with_target_group_arns(self.target_group_arns.clone());
        for name in &self.load_balancer_names {
            group = group.with_load_balancer_name(name.clone());
        }

        if let Some(desired) = self.desired_capacity {
            group = group.with_desired_capacity(desired);
        }
        if let Some(cooldown) = self.cooldown {
            group = group.with_cooldown_secs(cooldown.as_secs());
        }
        if let Some(health_check) = &self.health_check {
            group = group.with_health_check(
                health_check.check_type,
                health_check.grace_period.map(|g| g.as_secs() as i64),
            );
        }
        if let Some(lifetime) = self.max_instance_lifetime {
            group = group.with_max_instance_lifetime(lifetime.as_secs() as i64);
        }
        if let Some(protected) = self.new_instances_protected {
            group = group.with_scale_in_protection(protected);
        }
        if let Some(rebalance) = self.capacity_rebalance {
            group = group.with_capacity_rebalance(rebalance);
        }
        if !self.group_metrics.is_empty() {
            group = group
                .with_metrics_collection(MetricsCollection::one_minute(self.group_metrics.clone()));
        }
        for notification in &self.notifications {
            group = group.with_notification(NotificationConfiguration {
                topic_arn: notification.topic_arn.clone(),
                notification_types: notification.event_types(),
            });
        }
        for tag in &self.tags {
            group = group.with_tag(tag.clone());
        }
        if let Some(signals) = &self.signals {
            group = group.with_creation_policy(
                signals.render_creation_policy(self.min_capacity, self.desired_capacity),
            );
        }
        if let Some(policy) = &self.update_policy {
            group = group.with_update_policy(policy.render(self.signals.as_ref()));
        }
        group
    }

    /// Validate the group and add it, its launch configuration and all
    /// accumulated children to the template
    pub fn add_to(&self, template: &mut Template) -> Result<LogicalId, AutoScalingError> {
        self.validate()?;

        let launch_config_id = self.logical_id.child("launch-config");
        template.add_resource(launch_config_id.clone(), &self.render_launch_configuration()?)?;
        template.add_resource(self.logical_id.clone(), &self.render_group(&launch_config_id))?;

        for (id, policy) in &self.policies {
            template.add_resource(id.clone(), policy)?;
        }
        for (id, alarm) in &self.alarms {
            template.add_resource(id.clone(), alarm)?;
        }
        for (id, hook) in &self.lifecycle_hooks {
            template.add_resource(id.clone(), hook)?;
        }
        for (id, action) in &self.scheduled_actions {
            template.add_resource(id.clone(), action)?;
        }
        if let Some((id, pool)) = &self.warm_pool {
            template.add_resource(id.clone(), pool)?;
        }

        Ok(self.logical_id.clone())
    }
}
