//! Signals - CreationPolicy assembly
//!
//! A group can hold a stack deployment until its instances report
//! readiness via cfn-signal. `Signals` decides how many signals to wait
//! for and renders the `CreationPolicy` block.

use cirrus_core::duration::Duration;
use serde_json::{Value, json};

/// Default time to wait for instance signals
const DEFAULT_TIMEOUT: Duration = Duration::minutes(5);

/// How many launched instances must signal success
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SignalCount {
    /// Wait for the desired capacity (falling back to the minimum)
    All,
    /// Wait for the minimum capacity
    MinCapacity,
    /// Wait for a fixed number of signals
    Count(u32),
}

/// Readiness signals the group waits for at creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signals {
    count: SignalCount,
    timeout: Duration,
    min_success_percentage: Option<u32>,
}

impl Signals {
    /// Wait for every instance the group brings up
    pub fn wait_for_all() -> Self {
        Self {
            count: SignalCount::All,
            timeout: DEFAULT_TIMEOUT,
            min_success_percentage: None,
        }
    }

    /// Wait for as many signals as the group's minimum capacity
    pub fn wait_for_min_capacity() -> Self {
        Self {
            count: SignalCount::MinCapacity,
            timeout: DEFAULT_TIMEOUT,
            min_success_percentage: None,
        }
    }

    /// Wait for a fixed number of signals
    pub fn wait_for_count(count: u32) -> Self {
        Self {
            count: SignalCount::Count(count),
            timeout: DEFAULT_TIMEOUT,
            min_success_percentage: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Share of signals that must be successes, 0-100
    pub fn with_min_success_percentage(mut self, percentage: u32) -> Self {
        self.min_success_percentage = Some(percentage);
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn min_success_percentage(&self) -> Option<u32> {
        self.min_success_percentage
    }

    /// Render the `CreationPolicy` block for a group with the given capacities
    pub fn render_creation_policy(&self, min_capacity: u32, desired_capacity: Option<u32>) -> Value {
        let count = match self.count {
            SignalCount::All => desired_capacity.unwrap_or(min_capacity),
            SignalCount::MinCapacity => min_capacity,
            SignalCount::Count(count) => count,
        };

        let mut policy = json!({
            "ResourceSignal": {
                "Count": count,
                "Timeout": self.timeout.to_iso8601(),
            }
        });
        if let Some(percentage) = self.min_success_percentage {
            policy["AutoScalingCreationPolicy"] =
                json!({"MinSuccessfulInstancesPercent": percentage});
        }
        policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wait_for_all_uses_desired_capacity() {
        let policy = Signals::wait_for_all().render_creation_policy(2, Some(7));
        assert_eq!(policy["ResourceSignal"]["Count"], 7);
        assert_eq!(policy["ResourceSignal"]["Timeout"], "PT5M");
    }

    #[test]
    fn wait_for_all_falls_back_to_min_capacity() {
        let policy = Signals::wait_for_all().render_creation_policy(2, None);
        assert_eq!(policy["ResourceSignal"]["Count"], 2);
    }

    #[test]
    fn wait_for_min_capacity_ignores_desired() {
        let policy = Signals::wait_for_min_capacity().render_creation_policy(3, Some(9));
        assert_eq!(policy["ResourceSignal"]["Count"], 3);
    }

    #[test]
    fn explicit_count_and_timeout() {
        let policy = Signals::wait_for_count(4)
            .with_timeout(Duration::minutes(15))
            .render_creation_policy(1, None);
        assert_eq!(policy["ResourceSignal"]["Count"], 4);
        assert_eq!(policy["ResourceSignal"]["Timeout"], "PT15M");
    }

    #[test]
    fn min_success_percentage_adds_creation_policy_block() {
        let policy = Signals::wait_for_all()
            .with_min_success_percentage(80)
            .render_creation_policy(2, None);
        assert_eq!(
            policy["AutoScalingCreationPolicy"]["MinSuccessfulInstancesPercent"],
            80
        );
    }

    #[test]
    fn no_percentage_means_no_extra_block() {
        let policy = Signals::wait_for_all().render_creation_policy(2, None);
        assert!(policy.get("AutoScalingCreationPolicy").is_none());
    }
}
