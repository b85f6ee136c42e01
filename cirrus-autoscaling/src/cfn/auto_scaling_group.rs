//! `AWS::AutoScaling::AutoScalingGroup`

use cirrus_core::expr::StringExpr;
use cirrus_core::resource::{CfnResource, LogicalId};
use cirrus_core::template::TemplateError;
use serde::Serialize;
use serde_json::Value;

use crate::types::{DefaultResult, GroupMetric, HealthCheckType, LifecycleTransition, TerminationPolicy};

use super::{opt_u32_as_string, u32_as_string};

/// An Auto Scaling group
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CfnAutoScalingGroup {
    #[serde(serialize_with = "u32_as_string")]
    pub min_size: u32,
    #[serde(serialize_with = "u32_as_string")]
    pub max_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_scaling_group_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub availability_zones: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity_rebalance: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooldown: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_instance_warmup: Option<i64>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "opt_u32_as_string"
    )]
    pub desired_capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_capacity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check_grace_period: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_check_type: Option<HealthCheckType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_configuration_name: Option<StringExpr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_template: Option<LaunchTemplateSpecification>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub lifecycle_hook_specification_list: Vec<LifecycleHookSpecification>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub load_balancer_names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_instance_lifetime: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub metrics_collection: Vec<MetricsCollection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mixed_instances_policy: Option<MixedInstancesPolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_instances_protected_from_scale_in: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notification_configurations: Vec<NotificationConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement_group: Option<String>,
    #[serde(
        rename = "ServiceLinkedRoleARN",
        skip_serializing_if = "Option::is_none"
    )]
    pub service_linked_role_arn: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<TagProperty>,
    #[serde(rename = "TargetGroupARNs", skip_serializing_if = "Vec::is_empty")]
    pub target_group_arns: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub termination_policies: Vec<TerminationPolicy>,
    #[serde(rename = "VPCZoneIdentifier", skip_serializing_if = "Vec::is_empty")]
    pub vpc_zone_identifier: Vec<String>,

    // Attachment-level blocks, not part of `Properties`
    #[serde(skip)]
    pub creation_policy: Option<Value>,
    #[serde(skip)]
    pub update_policy: Option<Value>,
    #[serde(skip)]
    pub depends_on: Vec<LogicalId>,
}

impl CfnAutoScalingGroup {
    pub fn new(min_size: u32, max_size: u32) -> Self {
        Self {
            min_size,
            max_size,
            auto_scaling_group_name: None,
            availability_zones: Vec::new(),
            capacity_rebalance: None,
            context: None,
            cooldown: None,
            default_instance_warmup: None,
            desired_capacity: None,
            desired_capacity_type: None,
            health_check_grace_period: None,
            health_check_type: None,
            instance_id: None,
            launch_configuration_name: None,
            launch_template: None,
            lifecycle_hook_specification_list: Vec::new(),
            load_balancer_names: Vec::new(),
            max_instance_lifetime: None,
            metrics_collection: Vec::new(),
            mixed_instances_policy: None,
            new_instances_protected_from_scale_in: None,
            notification_configurations: Vec::new(),
            placement_group: None,
            service_linked_role_arn: None,
            tags: Vec::new(),
            target_group_arns: Vec::new(),
            termination_policies: Vec::new(),
            vpc_zone_identifier: Vec::new(),
            creation_policy: None,
            update_policy: None,
            depends_on: Vec::new(),
        }
    }

    pub fn with_group_name(mut self, name: impl Into<String>) -> Self {
        self.auto_scaling_group_name = Some(name.into());
        self
    }

    pub fn with_availability_zones(mut self, zones: Vec<String>) -> Self {
        self.availability_zones = zones;
        self
    }

    pub fn with_capacity_rebalance(mut self, enabled: bool) -> Self {
        self.capacity_rebalance = Some(enabled);
        self
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_cooldown_secs(mut self, secs: u64) -> Self {
        self.cooldown = Some(secs.to_string());
        self
    }

    pub fn with_default_instance_warmup(mut self, secs: i64) -> Self {
        self.default_instance_warmup = Some(secs);
        self
    }

    pub fn with_desired_capacity(mut self, desired: u32) -> Self {
        self.desired_capacity = Some(desired);
        self
    }

    pub fn with_desired_capacity_type(mut self, capacity_type: impl Into<String>) -> Self {
        self.desired_capacity_type = Some(capacity_type.into());
        self
    }

    pub fn with_health_check(mut self, check_type: HealthCheckType, grace_period: Option<i64>) -> Self {
        self.health_check_type = Some(check_type);
        self.health_check_grace_period = grace_period;
        self
    }

    pub fn with_launch_configuration_name(mut self, name: impl Into<StringExpr>) -> Self {
        self.launch_configuration_name = Some(name.into());
        self
    }

    pub fn with_launch_template(mut self, spec: LaunchTemplateSpecification) -> Self {
        self.launch_template = Some(spec);
        self
    }

    pub fn with_lifecycle_hook(mut self, hook: LifecycleHookSpecification) -> Self {
        self.lifecycle_hook_specification_list.push(hook);
        self
    }

    pub fn with_load_balancer_name(mut self, name: impl Into<String>) -> Self {
        self.load_balancer_names.push(name.into());
        self
    }

    pub fn with_max_instance_lifetime(mut self, secs: i64) -> Self {
        self.max_instance_lifetime = Some(secs);
        self
    }

    pub fn with_metrics_collection(mut self, collection: MetricsCollection) -> Self {
        self.metrics_collection.push(collection);
        self
    }

    pub fn with_mixed_instances_policy(mut self, policy: MixedInstancesPolicy) -> Self {
        self.mixed_instances_policy = Some(policy);
        self
    }

    pub fn with_scale_in_protection(mut self, protected: bool) -> Self {
        self.new_instances_protected_from_scale_in = Some(protected);
        self
    }

    pub fn with_notification(mut self, configuration: NotificationConfiguration) -> Self {
        self.notification_configurations.push(configuration);
        self
    }

    pub fn with_placement_group(mut self, group: impl Into<String>) -> Self {
        self.placement_group = Some(group.into());
        self
    }

    pub fn with_service_linked_role_arn(mut self, arn: impl Into<String>) -> Self {
        self.service_linked_role_arn = Some(arn.into());
        self
    }

    pub fn with_tag(mut self, tag: TagProperty) -> Self {
        self.tags.push(tag);
        self
    }

    pub fn with_target_group_arns(mut self, arns: Vec<String>) -> Self {
        self.target_group_arns = arns;
        self
    }

    pub fn with_termination_policies(mut self, policies: Vec<TerminationPolicy>) -> Self {
        self.termination_policies = policies;
        self
    }

    pub fn with_vpc_zone_identifier(mut self, subnets: Vec<String>) -> Self {
        self.vpc_zone_identifier = subnets;
        self
    }

    pub fn with_creation_policy(mut self, policy: Value) -> Self {
        self.creation_policy = Some(policy);
        self
    }

    pub fn with_update_policy(mut self, policy: Value) -> Self {
        self.update_policy = Some(policy);
        self
    }

    pub fn with_dependency(mut self, id: LogicalId) -> Self {
        self.depends_on.push(id);
        self
    }
}

impl CfnResource for CfnAutoScalingGroup {
    fn type_name(&self) -> &'static str {
        "AWS::AutoScaling::AutoScalingGroup"
    }

    fn properties(&self) -> Result<Value, TemplateError> {
        Ok(serde_json::to_value(self)?)
    }

    fn creation_policy(&self) -> Option<Value> {
        self.creation_policy.clone()
    }

    fn update_policy(&self) -> Option<Value> {
        self.update_policy.clone()
    }

    fn depends_on(&self) -> Vec<LogicalId> {
        self.depends_on.clone()
    }
}

/// Reference to a launch template, by ID or by name
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LaunchTemplateSpecification {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_template_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_template_name: Option<String>,
    pub version: StringExpr,
}

impl LaunchTemplateSpecification {
    pub fn from_id(id: impl Into<String>, version: impl Into<StringExpr>) -> Self {
        Self {
            launch_template_id: Some(id.into()),
            launch_template_name: None,
            version: version.into(),
        }
    }

    pub fn from_name(name: impl Into<String>, version: impl Into<StringExpr>) -> Self {
        Self {
            launch_template_id: None,
            launch_template_name: Some(name.into()),
            version: version.into(),
        }
    }
}

/// Group metrics to publish and at what granularity
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricsCollection {
    pub granularity: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub metrics: Vec<GroupMetric>,
}

impl MetricsCollection {
    /// One-minute granularity; an empty metric list publishes all metrics
    pub fn one_minute(metrics: Vec<GroupMetric>) -> Self {
        Self {
            granularity: "1Minute".to_string(),
            metrics,
        }
    }
}

/// SNS notification for group scaling events
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct NotificationConfiguration {
    #[serde(rename = "TopicARN")]
    pub topic_arn: StringExpr,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notification_types: Vec<String>,
}

/// Group tag; `propagate_at_launch` controls whether instances inherit it
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TagProperty {
    pub key: String,
    pub value: String,
    pub propagate_at_launch: bool,
}

/// Lifecycle hook declared inline on the group
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LifecycleHookSpecification {
    pub lifecycle_hook_name: String,
    pub lifecycle_transition: LifecycleTransition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_result: Option<DefaultResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heartbeat_timeout: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_metadata: Option<String>,
    #[serde(
        rename = "NotificationTargetARN",
        skip_serializing_if = "Option::is_none"
    )]
    pub notification_target_arn: Option<String>,
    #[serde(rename = "RoleARN", skip_serializing_if = "Option::is_none")]
    pub role_arn: Option<String>,
}

/// Launch template plus instance distribution for mixed-instances groups
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MixedInstancesPolicy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instances_distribution: Option<InstancesDistribution>,
    pub launch_template: LaunchTemplate,
}

/// How on-demand and spot capacity is mixed
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstancesDistribution {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_demand_allocation_strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_demand_base_capacity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_demand_percentage_above_base_capacity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spot_allocation_strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spot_instance_pools: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spot_max_price: Option<String>,
}

/// Launch template and per-instance-type overrides
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LaunchTemplate {
    pub launch_template_specification: LaunchTemplateSpecification,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<LaunchTemplateOverrides>,
}

/// Per-instance-type override within a mixed-instances policy
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LaunchTemplateOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_requirements: Option<InstanceRequirements>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_template_specification: Option<LaunchTemplateSpecification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weighted_capacity: Option<String>,
}

/// Attribute-based instance type selection
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceRequirements {
    #[serde(rename = "MemoryMiB", skip_serializing_if = "Option::is_none")]
    pub memory_mib: Option<MinMaxRequest>,
    #[serde(rename = "VCpuCount", skip_serializing_if = "Option::is_none")]
    pub v_cpu_count: Option<MinMaxRequest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accelerator_count: Option<MinMaxRequest>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub accelerator_types: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed_instance_types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bare_metal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub burstable_performance: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cpu_manufacturers: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub excluded_instance_types: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub instance_generations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_storage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_demand_max_price_percentage_over_lowest_price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_hibernate_support: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spot_max_price_percentage_over_lowest_price: Option<i64>,
}

/// Inclusive numeric range request
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MinMaxRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<i64>,
}
