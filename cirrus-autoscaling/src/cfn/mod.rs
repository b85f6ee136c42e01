//! Typed CloudFormation resources for the Auto Scaling namespace
//!
//! One module per resource type. Each resource is a property bag:
//! required fields are taken by `new`, optional fields are populated
//! through `with_*` builders and omitted from the serialized `Properties`
//! block when unset. Wire names follow the CloudFormation schema.

pub mod alarm;
pub mod auto_scaling_group;
pub mod launch_configuration;
pub mod lifecycle_hook;
pub mod scaling_policy;
pub mod scheduled_action;
pub mod warm_pool;

pub use alarm::CfnAlarm;
pub use auto_scaling_group::CfnAutoScalingGroup;
pub use launch_configuration::CfnLaunchConfiguration;
pub use lifecycle_hook::CfnLifecycleHook;
pub use scaling_policy::CfnScalingPolicy;
pub use scheduled_action::CfnScheduledAction;
pub use warm_pool::CfnWarmPool;

use serde::Serializer;

// The CloudFormation schema types the group's capacity fields as strings.
pub(crate) fn u32_as_string<S: Serializer>(value: &u32, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}

pub(crate) fn opt_u32_as_string<S: Serializer>(
    value: &Option<u32>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serializer.serialize_str(&v.to_string()),
        None => serializer.serialize_none(),
    }
}
