//! Cirrus AWS Auto Scaling
//!
//! Typed CloudFormation resources for the `AWS::AutoScaling` namespace and
//! higher-level constructs that assemble them into template fragments:
//! groups with launch configurations, step and target-tracking scaling
//! wired to CloudWatch alarms, scheduled actions, lifecycle hooks and
//! warm pools.

pub mod cfn;
pub mod constructs;
pub mod intervals;
pub mod types;

pub use constructs::AutoScalingError;
pub use constructs::auto_scaling_group::AutoScalingGroup;
pub use constructs::schedule::{CronOptions, Schedule};
pub use constructs::signals::Signals;
pub use constructs::update_policy::{RollingUpdateOptions, UpdatePolicy};
