//! `AWS::AutoScaling::ScheduledAction`

use cirrus_core::expr::StringExpr;
use cirrus_core::resource::CfnResource;
use cirrus_core::template::TemplateError;
use serde::Serialize;
use serde_json::Value;

/// Capacity change applied on a schedule
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CfnScheduledAction {
    pub auto_scaling_group_name: StringExpr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub desired_capacity: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recurrence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
}

impl CfnScheduledAction {
    pub fn new(auto_scaling_group_name: impl Into<StringExpr>) -> Self {
        Self {
            auto_scaling_group_name: auto_scaling_group_name.into(),
            desired_capacity: None,
            end_time: None,
            max_size: None,
            min_size: None,
            recurrence: None,
            start_time: None,
            time_zone: None,
        }
    }

    pub fn with_desired_capacity(mut self, desired: u32) -> Self {
        self.desired_capacity = Some(desired);
        self
    }

    pub fn with_min_size(mut self, min: u32) -> Self {
        self.min_size = Some(min);
        self
    }

    pub fn with_max_size(mut self, max: u32) -> Self {
        self.max_size = Some(max);
        self
    }

    pub fn with_recurrence(mut self, expression: impl Into<String>) -> Self {
        self.recurrence = Some(expression.into());
        self
    }

    pub fn with_start_time(mut self, time: impl Into<String>) -> Self {
        self.start_time = Some(time.into());
        self
    }

    pub fn with_end_time(mut self, time: impl Into<String>) -> Self {
        self.end_time = Some(time.into());
        self
    }

    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = Some(time_zone.into());
        self
    }
}

impl CfnResource for CfnScheduledAction {
    fn type_name(&self) -> &'static str {
        "AWS::AutoScaling::ScheduledAction"
    }

    fn properties(&self) -> Result<Value, TemplateError> {
        Ok(serde_json::to_value(self)?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn capacities_serialize_as_integers() {
        let action = CfnScheduledAction::new("web")
            .with_min_size(2)
            .with_max_size(10)
            .with_desired_capacity(5)
            .with_recurrence("0 8 * * 1-5");
        assert_eq!(
            action.properties().unwrap(),
            json!({
                "AutoScalingGroupName": "web",
                "MinSize": 2,
                "MaxSize": 10,
                "DesiredCapacity": 5,
                "Recurrence": "0 8 * * 1-5",
            })
        );
    }

    #[test]
    fn unset_capacities_are_absent() {
        let action = CfnScheduledAction::new("web").with_min_size(2);
        let props = action.properties().unwrap();
        assert!(props.get("MaxSize").is_none());
        assert!(props.get("DesiredCapacity").is_none());
    }

    #[test]
    fn start_end_and_time_zone_round_trip() {
        let action = CfnScheduledAction::new("web")
            .with_start_time("2026-09-01T08:00:00Z")
            .with_end_time("2026-09-30T18:00:00Z")
            .with_time_zone("Europe/Berlin");
        assert_eq!(action.start_time.as_deref(), Some("2026-09-01T08:00:00Z"));
        assert_eq!(action.end_time.as_deref(), Some("2026-09-30T18:00:00Z"));
        assert_eq!(action.time_zone.as_deref(), Some("Europe/Berlin"));
    }
}
