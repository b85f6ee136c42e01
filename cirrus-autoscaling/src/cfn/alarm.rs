//! `AWS::CloudWatch::Alarm`
//!
//! Only the surface step scaling needs: a metric alarm whose actions
//! trigger scaling policies.

use cirrus_core::expr::StringExpr;
use cirrus_core::resource::CfnResource;
use cirrus_core::template::TemplateError;
use serde::Serialize;
use serde_json::Value;

use crate::types::{ComparisonOperator, MetricStatistic};

use super::scaling_policy::MetricDimension;

/// CloudWatch metric alarm
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CfnAlarm {
    pub comparison_operator: ComparisonOperator,
    pub evaluation_periods: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alarm_actions: Vec<StringExpr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alarm_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alarm_name: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dimensions: Vec<MetricDimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistic: Option<MetricStatistic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treat_missing_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl CfnAlarm {
    pub fn new(comparison_operator: ComparisonOperator, evaluation_periods: u32) -> Self {
        Self {
            comparison_operator,
            evaluation_periods,
            alarm_actions: Vec::new(),
            alarm_description: None,
            alarm_name: None,
            dimensions: Vec::new(),
            metric_name: None,
            namespace: None,
            period: None,
            statistic: None,
            threshold: None,
            treat_missing_data: None,
            unit: None,
        }
    }

    pub fn with_alarm_action(mut self, action: impl Into<StringExpr>) -> Self {
        self.alarm_actions.push(action.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.alarm_description = Some(description.into());
        self
    }

    pub fn with_dimension(mut self, name: impl Into<String>, value: impl Into<StringExpr>) -> Self {
        self.dimensions.push(MetricDimension {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn with_metric(mut self, namespace: impl Into<String>, metric_name: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self.metric_name = Some(metric_name.into());
        self
    }

    pub fn with_period_secs(mut self, secs: u32) -> Self {
        self.period = Some(secs);
        self
    }

    pub fn with_statistic(mut self, statistic: MetricStatistic) -> Self {
        self.statistic = Some(statistic);
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }
}

impl CfnResource for CfnAlarm {
    fn type_name(&self) -> &'static str {
        "AWS::CloudWatch::Alarm"
    }

    fn properties(&self) -> Result<Value, TemplateError> {
        Ok(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use cirrus_core::resource::LogicalId;
    use serde_json::json;

    use super::*;

    #[test]
    fn alarm_wires_policy_ref_as_action() {
        let policy = LogicalId::from_name("web-scale-out");
        let alarm = CfnAlarm::new(ComparisonOperator::GreaterThanOrEqualToThreshold, 1)
            .with_metric("AWS/EC2", "CPUUtilization")
            .with_statistic(MetricStatistic::Average)
            .with_period_secs(300)
            .with_threshold(70.0)
            .with_dimension("AutoScalingGroupName", StringExpr::reference(&LogicalId::from_name("web")))
            .with_alarm_action(StringExpr::reference(&policy));

        let props = alarm.properties().unwrap();
        assert_eq!(props["ComparisonOperator"], "GreaterThanOrEqualToThreshold");
        assert_eq!(props["EvaluationPeriods"], 1);
        assert_eq!(props["Threshold"], 70.0);
        assert_eq!(props["AlarmActions"], json!([{"Ref": "WebScaleOut"}]));
        assert_eq!(
            props["Dimensions"],
            json!([{"Name": "AutoScalingGroupName", "Value": {"Ref": "Web"}}])
        );
    }

    #[test]
    fn optional_metric_fields_are_absent_when_unset() {
        let alarm = CfnAlarm::new(ComparisonOperator::LessThanThreshold, 2);
        let props = alarm.properties().unwrap();
        assert!(props.get("MetricName").is_none());
        assert!(props.get("Threshold").is_none());
        assert!(props.get("AlarmActions").is_none());
    }
}
