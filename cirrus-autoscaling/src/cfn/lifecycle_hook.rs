//! `AWS::AutoScaling::LifecycleHook`

use cirrus_core::expr::StringExpr;
use cirrus_core::resource::CfnResource;
use cirrus_core::template::TemplateError;
use serde::Serialize;
use serde_json::Value;

use crate::types::{DefaultResult, LifecycleTransition};

/// Hook that pauses instances during launch or termination
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CfnLifecycleHook {
    pub auto_scaling_group_name: StringExpr,
    pub lifecycle_transition: LifecycleTransition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_result: Option<DefaultResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heartbeat_timeout: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifecycle_hook_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_metadata: Option<String>,
    #[serde(
        rename = "NotificationTargetARN",
        skip_serializing_if = "Option::is_none"
    )]
    pub notification_target_arn: Option<StringExpr>,
    #[serde(rename = "RoleARN", skip_serializing_if = "Option::is_none")]
    pub role_arn: Option<StringExpr>,
}

impl CfnLifecycleHook {
    pub fn new(
        auto_scaling_group_name: impl Into<StringExpr>,
        lifecycle_transition: LifecycleTransition,
    ) -> Self {
        Self {
            auto_scaling_group_name: auto_scaling_group_name.into(),
            lifecycle_transition,
            default_result: None,
            heartbeat_timeout: None,
            lifecycle_hook_name: None,
            notification_metadata: None,
            notification_target_arn: None,
            role_arn: None,
        }
    }

    pub fn with_default_result(mut self, result: DefaultResult) -> Self {
        self.default_result = Some(result);
        self
    }

    pub fn with_heartbeat_timeout(mut self, secs: i64) -> Self {
        self.heartbeat_timeout = Some(secs);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.lifecycle_hook_name = Some(name.into());
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
}

impl CfnResource for CfnLifecycleHook {
    fn type_name(&self) -> &'static str {
        "AWS::AutoScaling::LifecycleHook"
    }

    fn properties(&self) -> Result<Value, TemplateError> {
        Ok(serde_json::to_value(self)?)
    }
}
