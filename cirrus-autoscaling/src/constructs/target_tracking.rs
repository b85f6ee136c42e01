//! Target tracking - Policies that hold a metric at a target value

use cirrus_core::duration::Duration;
use cirrus_core::expr::StringExpr;

use crate::cfn::scaling_policy::{
    CfnScalingPolicy, CustomizedMetricSpecification, MetricDimension, TargetTrackingConfiguration,
};
use crate::types::{MetricStatistic, PolicyType, PredefinedMetricType};

/// Options shared by all target tracking policies
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetTrackingOptions {
    /// Wait between scaling activities
    pub cooldown: Option<Duration>,
    /// How long a new instance takes to start contributing to the metric
    pub estimated_instance_warmup: Option<Duration>,
    /// Keep the policy from ever removing capacity
    pub disable_scale_in: Option<bool>,
}

/// A customized CloudWatch metric to track
#[derive(Debug, Clone, PartialEq)]
pub struct CustomMetric {
    pub namespace: String,
    pub metric_name: String,
    pub statistic: MetricStatistic,
    pub dimensions: Vec<(String, StringExpr)>,
    pub unit: Option<String>,
}

impl CustomMetric {
    pub fn new(
        namespace: impl Into<String>,
        metric_name: impl Into<String>,
        statistic: MetricStatistic,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            metric_name: metric_name.into(),
            statistic,
            dimensions: Vec::new(),
            unit: None,
        }
    }

    pub fn with_dimension(mut self, name: impl Into<String>, value: impl Into<StringExpr>) -> Self {
        self.dimensions.push((name.into(), value.into()));
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}

/// Build a target tracking policy for a predefined metric
pub fn predefined_metric_policy(
    group_name: StringExpr,
    metric: PredefinedMetricType,
    target_value: f64,
    resource_label: Option<String>,
    options: &TargetTrackingOptions,
) -> CfnScalingPolicy {
    let mut configuration = TargetTrackingConfiguration::predefined(metric, target_value);
    if let Some(label) = resource_label {
        configuration = configuration.with_resource_label(label);
    }
    finish_policy(group_name, configuration, options)
}

/// Build a target tracking policy for a customized metric
pub fn custom_metric_policy(
    group_name: StringExpr,
    metric: CustomMetric,
    target_value: f64,
    options: &TargetTrackingOptions,
) -> CfnScalingPolicy {
    let configuration = TargetTrackingConfiguration::customized(
        CustomizedMetricSpecification {
            metric_name: metric.metric_name,
            namespace: metric.namespace,
            statistic: metric.statistic,
            dimensions: metric
                .dimensions
                .into_iter()
                .map(|(name, value)| MetricDimension { name, value })
                .collect(),
            unit: metric.unit,
        },
        target_value,
    );
    finish_policy(group_name, configuration, options)
}

fn finish_policy(
    group_name: StringExpr,
    mut configuration: TargetTrackingConfiguration,
    options: &TargetTrackingOptions,
) -> CfnScalingPolicy {
    if let Some(disabled) = options.disable_scale_in {
        configuration = configuration.with_disable_scale_in(disabled);
    }

    let mut policy = CfnScalingPolicy::new(group_name)
        .with_policy_type(PolicyType::TargetTrackingScaling)
        .with_target_tracking(configuration);
    if let Some(cooldown) = options.cooldown {
        policy = policy.with_cooldown_secs(cooldown.as_secs());
    }
    if let Some(warmup) = options.estimated_instance_warmup {
        policy = policy.with_estimated_instance_warmup(warmup.as_secs() as i64);
    }
    policy
}
