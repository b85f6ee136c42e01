//! Lifecycle hooks - Pausing instances during launch or termination

use cirrus_core::duration::Duration;
use cirrus_core::expr::StringExpr;

use crate::cfn::lifecycle_hook::CfnLifecycleHook;
use crate::types::{DefaultResult, LifecycleTransition};

use super::AutoScalingError;

/// Shortest heartbeat the service accepts, in seconds
const MIN_HEARTBEAT_SECS: u64 = 30;
/// Longest heartbeat the service accepts, in seconds
const MAX_HEARTBEAT_SECS: u64 = 7200;
/// Longest notification metadata payload, in characters
const MAX_METADATA_LEN: usize = 1023;

/// Settings for a lifecycle hook
#[derive(Debug, Clone, PartialEq)]
pub struct LifecycleHookProps {
    pub lifecycle_transition: LifecycleTransition,
    pub default_result: Option<DefaultResult>,
    pub heartbeat_timeout: Option<Duration>,
    pub notification_metadata: Option<String>,
    pub notification_target_arn: Option<StringExpr>,
    pub role_arn: Option<StringExpr>,
}

impl LifecycleHookProps {
    pub fn new(lifecycle_transition: LifecycleTransition) -> Self {
        Self {
            lifecycle_transition,
            default_result: None,
            heartbeat_timeout: None,
            notification_metadata: None,
            notification_target_arn: None,
            role_arn: None,
        }
    }

    pub fn with_default_result(mut self, result: DefaultResult) -> Self {
        self.default_result = Some(result);
        self
    }

    pub fn with_heartbeat_timeout(mut self, timeout: Duration) -> Self {
        self.heartbeat_timeout = Some(timeout);
        self
    }

    pub fn with_notification_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.notification_metadata = Some(metadata.into());
        self
    }

    pub fn with_notification_target(mut self, arn: impl Into<StringExpr>) -> Self {
        self.notification_target_arn = Some(arn.into());
        self
    }

    pub fn with_role(mut self, arn: impl Into<StringExpr>) -> Self {
        self.role_arn = Some(arn.into());
        self
    }

    /// Validate and render into a hook resource attached to `group_name`
    pub fn render(
        &self,
        group_name: StringExpr,
        hook_name: &str,
    ) -> Result<CfnLifecycleHook, AutoScalingError> {
        if let Some(timeout) = self.heartbeat_timeout {
            let secs = timeout.as_secs();
            if !(MIN_HEARTBEAT_SECS..=MAX_HEARTBEAT_SECS).contains(&secs) {
                return Err(AutoScalingError::validation(format!(
                    "lifecycle hook '{}': heartbeat timeout must be between {} and {} seconds, got {}",
                    hook_name, MIN_HEARTBEAT_SECS, MAX_HEARTBEAT_SECS, secs
                )));
            }
        }
        if let Some(metadata) = &self.notification_metadata
            && metadata.len() > MAX_METADATA_LEN
        {
            return Err(AutoScalingError::validation(format!(
                "lifecycle hook '{}': notification metadata exceeds {} characters",
                hook_name, MAX_METADATA_LEN
            )));
        }
        if self.notification_target_arn.is_some() && self.role_arn.is_none() {
            return Err(AutoScalingError::validation(format!(
                "lifecycle hook '{}': a notification target needs a role to publish with",
                hook_name
            )));
        }

        let mut hook =
            CfnLifecycleHook::new(group_name, self.lifecycle_transition).with_name(hook_name);
        if let Some(result) = self.default_result {
            hook = hook.with_default_result(result);
        }
        if let Some(timeout) = self.heartbeat_timeout {
            hook = hook.with_heartbeat_timeout(timeout.as_secs() as i64);
        }
        if let Some(metadata) = &self.notification_metadata {
            hook = hook.with_notification_metadata(metadata.clone());
        }
        if let Some(target) = &self.notification_target_arn {
            hook = hook.with_notification_target(target.clone());
        }
        if let Some(role) = &self.role_arn {
            hook = hook.with_role(role.clone());
        }
        Ok(hook)
    }
}
