//! Scheduled scaling - Capacity changes on a recurrence

use chrono::{DateTime, Utc};
use cirrus_core::expr::StringExpr;

use crate::cfn::scheduled_action::CfnScheduledAction;

use super::AutoScalingError;
use super::schedule::Schedule;

/// Settings for a scheduled capacity change
///
/// At least one of the capacity fields must be set; the group keeps its
/// current value for the ones left out.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledScalingProps {
    pub schedule: Schedule,
    pub min_capacity: Option<u32>,
    pub max_capacity: Option<u32>,
    pub desired_capacity: Option<u32>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub time_zone: Option<String>,
}

impl ScheduledScalingProps {
    pub fn new(schedule: Schedule) -> Self {
        Self {
            schedule,
            min_capacity: None,
            max_capacity: None,
            desired_capacity: None,
            start_time: None,
            end_time: None,
            time_zone: None,
        }
    }

    pub fn with_min_capacity(mut self, min: u32) -> Self {
        self.min_capacity = Some(min);
        self
    }

    pub fn with_max_capacity(mut self, max: u32) -> Self {
        self.max_capacity = Some(max);
        self
    }

    pub fn with_desired_capacity(mut self, desired: u32) -> Self {
        self.desired_capacity = Some(desired);
        self
    }

    pub fn with_start_time(mut self, start: DateTime<Utc>) -> Self {
        self.start_time = Some(start);
        self
    }

    pub fn with_end_time(mut self, end: DateTime<Utc>) -> Self {
        self.end_time = Some(end);
        self
    }

    pub fn with_time_zone(mut self, time_zone: impl Into<String>) -> Self {
        self.time_zone = Some(time_zone.into());
        self
    }

    /// Validate and render into a scheduled action for `group_name`
    pub fn render(
        &self,
        group_name: StringExpr,
        action_name: &str,
    ) -> Result<CfnScheduledAction, AutoScalingError> {
        if self.min_capacity.is_none()
            && self.max_capacity.is_none()
            && self.desired_capacity.is_none()
        {
            return Err(AutoScalingError::validation(format!(
                "scheduled action '{}': set at least one of min, max or desired capacity",
                action_name
            )));
        }
        if let (Some(min), Some(max)) = (self.min_capacity, self.max_capacity)
            && min > max
        {
            return Err(AutoScalingError::validation(format!(
                "scheduled action '{}': min capacity {} exceeds max capacity {}",
                action_name, min, max
            )));
        }

        let mut action = CfnScheduledAction::new(group_name)
            .with_recurrence(self.schedule.expression_string());
        if let Some(min) = self.min_capacity {
            action = action.with_min_size(min);
        }
        if let Some(max) = self.max_capacity {
            action = action.with_max_size(max);
        }
        if let Some(desired) = self.desired_capacity {
            action = action.with_desired_capacity(desired);
        }
        if let Some(start) = self.start_time {
            action = action.with_start_time(start.format("%Y-%m-%dT%H:%M:%SZ").to_string());
        }
        if let Some(end) = self.end_time {
            action = action.with_end_time(end.format("%Y-%m-%dT%H:%M:%SZ").to_string());
        }
        if let Some(time_zone) = &self.time_zone {
            action = action.with_time_zone(time_zone.clone());
        }
        Ok(action)
    }
}
