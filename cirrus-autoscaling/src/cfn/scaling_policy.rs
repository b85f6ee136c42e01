//! `AWS::AutoScaling::ScalingPolicy`

use cirrus_core::expr::StringExpr;
use cirrus_core::resource::CfnResource;
use cirrus_core::template::TemplateError;
use serde::Serialize;
use serde_json::Value;

use crate::types::{
    AdjustmentType, MetricAggregationType, MetricStatistic, PolicyType, PredefinedMetricType,
    PredictiveScalingMetricPair,
};

/// Scaling policy attached to an auto scaling group
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CfnScalingPolicy {
    pub auto_scaling_group_name: StringExpr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_type: Option<PolicyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adjustment_type: Option<AdjustmentType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooldown: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_instance_warmup: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric_aggregation_type: Option<MetricAggregationType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_adjustment_magnitude: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scaling_adjustment: Option<i32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub step_adjustments: Vec<StepAdjustment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_tracking_configuration: Option<TargetTrackingConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predictive_scaling_configuration: Option<PredictiveScalingConfiguration>,
}

impl CfnScalingPolicy {
    pub fn new(auto_scaling_group_name: impl Into<StringExpr>) -> Self {
        Self {
            auto_scaling_group_name: auto_scaling_group_name.into(),
            policy_type: None,
            adjustment_type: None,
            cooldown: None,
            estimated_instance_warmup: None,
            metric_aggregation_type: None,
            min_adjustment_magnitude: None,
            scaling_adjustment: None,
            step_adjustments: Vec::new(),
            target_tracking_configuration: None,
            predictive_scaling_configuration: None,
        }
    }

    pub fn with_policy_type(mut self, policy_type: PolicyType) -> Self {
        self.policy_type = Some(policy_type);
        self
    }

    pub fn with_adjustment_type(mut self, adjustment_type: AdjustmentType) -> Self {
        self.adjustment_type = Some(adjustment_type);
        self
    }

    pub fn with_cooldown_secs(mut self, secs: u64) -> Self {
        self.cooldown = Some(secs.to_string());
        self
    }

    pub fn with_estimated_instance_warmup(mut self, secs: i64) -> Self {
        self.estimated_instance_warmup = Some(secs);
        self
    }

    pub fn with_metric_aggregation_type(mut self, aggregation: MetricAggregationType) -> Self {
        self.metric_aggregation_type = Some(aggregation);
        self
    }

    pub fn with_min_adjustment_magnitude(mut self, magnitude: i32) -> Self {
        self.min_adjustment_magnitude = Some(magnitude);
        self
    }

    pub fn with_scaling_adjustment(mut self, adjustment: i32) -> Self {
        self.scaling_adjustment = Some(adjustment);
        self
    }

    pub fn with_step_adjustment(mut self, step: StepAdjustment) -> Self {
        self.step_adjustments.push(step);
        self
    }

    pub fn with_target_tracking(mut self, configuration: TargetTrackingConfiguration) -> Self {
        self.target_tracking_configuration = Some(configuration);
        self
    }

    pub fn with_predictive_scaling(mut self, configuration: PredictiveScalingConfiguration) -> Self {
        self.predictive_scaling_configuration = Some(configuration);
        self
    }
}

impl CfnResource for CfnScalingPolicy {
    fn type_name(&self) -> &'static str {
        "AWS::AutoScaling::ScalingPolicy"
    }

    fn properties(&self) -> Result<Value, TemplateError> {
        Ok(serde_json::to_value(self)?)
    }
}

/// One step of a step scaling policy; bounds are relative to the alarm threshold
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StepAdjustment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric_interval_lower_bound: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric_interval_upper_bound: Option<f64>,
    pub scaling_adjustment: i32,
}

/// Target tracking settings; exactly one metric specification is set
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TargetTrackingConfiguration {
    pub target_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_scale_in: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predefined_metric_specification: Option<PredefinedMetricSpecification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customized_metric_specification: Option<CustomizedMetricSpecification>,
}

impl TargetTrackingConfiguration {
    pub fn predefined(metric: PredefinedMetricType, target_value: f64) -> Self {
        Self {
            target_value,
            disable_scale_in: None,
            predefined_metric_specification: Some(PredefinedMetricSpecification {
                predefined_metric_type: metric,
                resource_label: None,
            }),
            customized_metric_specification: None,
        }
    }

    pub fn customized(metric: CustomizedMetricSpecification, target_value: f64) -> Self {
        Self {
            target_value,
            disable_scale_in: None,
            predefined_metric_specification: None,
            customized_metric_specification: Some(metric),
        }
    }

    pub fn with_resource_label(mut self, label: impl Into<String>) -> Self {
        if let Some(spec) = &mut self.predefined_metric_specification {
            spec.resource_label = Some(label.into());
        }
        self
    }

    pub fn with_disable_scale_in(mut self, disabled: bool) -> Self {
        self.disable_scale_in = Some(disabled);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PredefinedMetricSpecification {
    pub predefined_metric_type: PredefinedMetricType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomizedMetricSpecification {
    pub metric_name: String,
    pub namespace: String,
    pub statistic: MetricStatistic,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dimensions: Vec<MetricDimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

/// CloudWatch metric dimension; the value may reference a template resource
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MetricDimension {
    pub name: String,
    pub value: StringExpr,
}

/// Predictive scaling settings
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PredictiveScalingConfiguration {
    pub metric_specifications: Vec<PredictiveScalingMetricSpecification>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_capacity_breach_behavior: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_capacity_buffer: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduling_buffer_time: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PredictiveScalingMetricSpecification {
    pub target_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub predefined_metric_pair_specification: Option<PredefinedMetricPairSpecification>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PredefinedMetricPairSpecification {
    pub predefined_metric_type: PredictiveScalingMetricPair,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_label: Option<String>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn minimal_policy_names_only_the_group() {
        let policy = CfnScalingPolicy::new("web");
        assert_eq!(
            policy.properties().unwrap(),
            json!({"AutoScalingGroupName": "web"})
        );
    }

    #[test]
    fn target_tracking_with_predefined_metric() {
        let policy = CfnScalingPolicy::new("web")
            .with_policy_type(PolicyType::TargetTrackingScaling)
            .with_target_tracking(TargetTrackingConfiguration::predefined(
                PredefinedMetricType::AverageCpuUtilization,
                50.0,
            ));
        let props = policy.properties().unwrap();
        assert_eq!(props["PolicyType"], "TargetTrackingScaling");
        let config = &props["TargetTrackingConfiguration"];
        assert_eq!(config["TargetValue"], 50.0);
        assert_eq!(
            config["PredefinedMetricSpecification"]["PredefinedMetricType"],
            "ASGAverageCPUUtilization"
        );
        assert!(config.get("CustomizedMetricSpecification").is_none());
    }

    #[test]
    fn customized_metric_carries_dimensions() {
        let config = TargetTrackingConfiguration::customized(
            CustomizedMetricSpecification {
                metric_name: "QueueDepth".to_string(),
                namespace: "Orders".to_string(),
                statistic: MetricStatistic::Average,
                dimensions: vec![MetricDimension {
                    name: "QueueName".to_string(),
                    value: "orders".into(),
                }],
                unit: None,
            },
            100.0,
        );
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(
            value["CustomizedMetricSpecification"]["Dimensions"][0]["Name"],
            "QueueName"
        );
        assert!(value.get("PredefinedMetricSpecification").is_none());
    }

    #[test]
    fn step_adjustments_keep_relative_bounds() {
        let policy = CfnScalingPolicy::new("web")
            .with_policy_type(PolicyType::StepScaling)
            .with_adjustment_type(AdjustmentType::ChangeInCapacity)
            .with_step_adjustment(StepAdjustment {
                metric_interval_lower_bound: Some(0.0),
                metric_interval_upper_bound: None,
                scaling_adjustment: 2,
            });
        let steps = &policy.properties().unwrap()["StepAdjustments"];
        assert_eq!(steps[0]["MetricIntervalLowerBound"], 0.0);
        assert!(steps[0].get("MetricIntervalUpperBound").is_none());
        assert_eq!(steps[0]["ScalingAdjustment"], 2);
    }

    #[test]
    fn predictive_configuration_uses_metric_pairs() {
        let policy = CfnScalingPolicy::new("web")
            .with_policy_type(PolicyType::PredictiveScaling)
            .with_predictive_scaling(PredictiveScalingConfiguration {
                metric_specifications: vec![PredictiveScalingMetricSpecification {
                    target_value: 60.0,
                    predefined_metric_pair_specification: Some(PredefinedMetricPairSpecification {
                        predefined_metric_type: PredictiveScalingMetricPair::CpuUtilization,
                        resource_label: None,
                    }),
                }],
                max_capacity_breach_behavior: None,
                max_capacity_buffer: None,
                mode: Some("ForecastAndScale".to_string()),
                scheduling_buffer_time: None,
            });
        let config = &policy.properties().unwrap()["PredictiveScalingConfiguration"];
        assert_eq!(config["Mode"], "ForecastAndScale");
        assert_eq!(
            config["MetricSpecifications"][0]["PredefinedMetricPairSpecification"]
                ["PredefinedMetricType"],
            "ASGCPUUtilization"
        );
    }

    #[test]
    fn equality_is_field_by_field() {
        let a = CfnScalingPolicy::new("web").with_cooldown_secs(300);
        let b = CfnScalingPolicy::new("web").with_cooldown_secs(300);
        let c = CfnScalingPolicy::new("web").with_cooldown_secs(60);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
