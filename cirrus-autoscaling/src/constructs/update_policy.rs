//! UpdatePolicy - How CloudFormation replaces a group's instances
//!
//! Renders the resource-level `UpdatePolicy` block: rolling updates that
//! cycle instances in batches, or wholesale replacement of the group.

use cirrus_core::duration::Duration;
use serde_json::{Value, json};

use crate::types::ScalingProcess;

use super::signals::Signals;

/// Processes suspended during a rolling update unless overridden
const DEFAULT_SUSPENDED_PROCESSES: [ScalingProcess; 5] = [
    ScalingProcess::HealthCheck,
    ScalingProcess::ReplaceUnhealthy,
    ScalingProcess::AzRebalance,
    ScalingProcess::AlarmNotification,
    ScalingProcess::ScheduledActions,
];

/// Settings for a rolling update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RollingUpdateOptions {
    /// Instances replaced at a time (default 1)
    pub max_batch_size: Option<u32>,
    /// Instances that must keep serving during the update (default 0)
    pub min_instances_in_service: Option<u32>,
    /// Share of instances per batch that must succeed, 0-100
    pub min_success_percentage: Option<u32>,
    /// Wait between batches; defaults to the signal timeout when signals are on
    pub pause_time: Option<Duration>,
    /// Processes to suspend while updating
    pub suspend_processes: Option<Vec<ScalingProcess>>,
    /// Wait for cfn-signal after each batch; defaults to whether signals are on
    pub wait_on_resource_signals: Option<bool>,
}

/// Resource-level update behavior of a group
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdatePolicy {
    RollingUpdate(RollingUpdateOptions),
    ReplacingUpdate,
}

impl UpdatePolicy {
    /// Replace instances in batches, keeping the group in service
    pub fn rolling_update(options: RollingUpdateOptions) -> Self {
        Self::RollingUpdate(options)
    }

    /// Replace the whole group and switch over on success
    pub fn replacing_update() -> Self {
        Self::ReplacingUpdate
    }

    /// Render the `UpdatePolicy` block; signal settings fill the defaults
    pub fn render(&self, signals: Option<&Signals>) -> Value {
        match self {
            Self::ReplacingUpdate => json!({
                "AutoScalingReplacingUpdate": {"WillReplace": true}
            }),
            Self::RollingUpdate(options) => {
                let suspended = options
                    .suspend_processes
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SUSPENDED_PROCESSES.to_vec());
                let wait_on_signals = options
                    .wait_on_resource_signals
                    .unwrap_or(signals.is_some());
                let pause_time = options
                    .pause_time
                    .or_else(|| signals.map(|s| s.timeout()))
                    .unwrap_or(Duration::seconds(0));

                let mut rolling = json!({
                    "MaxBatchSize": options.max_batch_size.unwrap_or(1),
                    "MinInstancesInService": options.min_instances_in_service.unwrap_or(0),
                    "PauseTime": pause_time.to_iso8601(),
                    "SuspendProcesses": suspended,
                    "WaitOnResourceSignals": wait_on_signals,
                });
                let percentage = options
                    .min_success_percentage
                    .or_else(|| signals.and_then(|s| s.min_success_percentage()));
                if let Some(percentage) = percentage {
                    rolling["MinSuccessfulInstancesPercent"] = json!(percentage);
                }

                json!({"AutoScalingRollingUpdate": rolling})
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replacing_update_sets_will_replace() {
        let policy = UpdatePolicy::replacing_update().render(None);
        assert_eq!(policy["AutoScalingReplacingUpdate"]["WillReplace"], true);
    }

    #[test]
    fn rolling_update_defaults() {
        let policy = UpdatePolicy::rolling_update(RollingUpdateOptions::default()).render(None);
        let rolling = &policy["AutoScalingRollingUpdate"];
        assert_eq!(rolling["MaxBatchSize"], 1);
        assert_eq!(rolling["MinInstancesInService"], 0);
        assert_eq!(rolling["PauseTime"], "PT0S");
        assert_eq!(rolling["WaitOnResourceSignals"], false);
        assert_eq!(
            rolling["SuspendProcesses"],
            serde_json::json!([
                "HealthCheck",
                "ReplaceUnhealthy",
                "AZRebalance",
                "AlarmNotification",
                "ScheduledActions",
            ])
        );
        assert!(rolling.get("MinSuccessfulInstancesPercent").is_none());
    }

    #[test]
    fn signals_drive_pause_time_and_waiting() {
        let signals = Signals::wait_for_all().with_timeout(Duration::minutes(10));
        let policy =
            UpdatePolicy::rolling_update(RollingUpdateOptions::default()).render(Some(&signals));
        let rolling = &policy["AutoScalingRollingUpdate"];
        assert_eq!(rolling["PauseTime"], "PT10M");
        assert_eq!(rolling["WaitOnResourceSignals"], true);
    }

    #[test]
    fn explicit_options_beat_signal_defaults() {
        let signals = Signals::wait_for_all().with_timeout(Duration::minutes(10));
        let policy = UpdatePolicy::rolling_update(RollingUpdateOptions {
            max_batch_size: Some(3),
            min_instances_in_service: Some(2),
            pause_time: Some(Duration::minutes(1)),
            wait_on_resource_signals: Some(false),
            suspend_processes: Some(vec![ScalingProcess::Launch]),
            min_success_percentage: Some(90),
        })
        .render(Some(&signals));
        let rolling = &policy["AutoScalingRollingUpdate"];
        assert_eq!(rolling["MaxBatchSize"], 3);
        assert_eq!(rolling["MinInstancesInService"], 2);
        assert_eq!(rolling["PauseTime"], "PT1M");
        assert_eq!(rolling["WaitOnResourceSignals"], false);
        assert_eq!(rolling["SuspendProcesses"], serde_json::json!(["Launch"]));
        assert_eq!(rolling["MinSuccessfulInstancesPercent"], 90);
    }

    #[test]
    fn signal_percentage_flows_into_rolling_update() {
        let signals = Signals::wait_for_all().with_min_success_percentage(75);
        let policy =
            UpdatePolicy::rolling_update(RollingUpdateOptions::default()).render(Some(&signals));
        assert_eq!(
            policy["AutoScalingRollingUpdate"]["MinSuccessfulInstancesPercent"],
            75
        );
    }
}
