//! `AWS::AutoScaling::WarmPool`

use cirrus_core::expr::StringExpr;
use cirrus_core::resource::CfnResource;
use cirrus_core::template::TemplateError;
use serde::Serialize;
use serde_json::Value;

use crate::types::PoolState;

/// Pool of pre-initialized instances kept next to a group
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CfnWarmPool {
    pub auto_scaling_group_name: StringExpr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance_reuse_policy: Option<InstanceReusePolicy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_group_prepared_capacity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool_state: Option<PoolState>,
}

impl CfnWarmPool {
    pub fn new(auto_scaling_group_name: impl Into<StringExpr>) -> Self {
        Self {
            auto_scaling_group_name: auto_scaling_group_name.into(),
            instance_reuse_policy: None,
            max_group_prepared_capacity: None,
            min_size: None,
            pool_state: None,
        }
    }

    pub fn with_instance_reuse(mut self, reuse_on_scale_in: bool) -> Self {
        self.instance_reuse_policy = Some(InstanceReusePolicy {
            reuse_on_scale_in: Some(reuse_on_scale_in),
        });
        self
    }

    pub fn with_max_group_prepared_capacity(mut self, capacity: i64) -> Self {
        self.max_group_prepared_capacity = Some(capacity);
        self
    }

    pub fn with_min_size(mut self, min: u32) -> Self {
        self.min_size = Some(min);
        self
    }

    pub fn with_pool_state(mut self, state: PoolState) -> Self {
        self.pool_state = Some(state);
        self
    }
}

impl CfnResource for CfnWarmPool {
    fn type_name(&self) -> &'static str {
        "AWS::AutoScaling::WarmPool"
    }

    fn properties(&self) -> Result<Value, TemplateError> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Whether scale-in returns instances to the pool instead of terminating
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceReusePolicy {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reuse_on_scale_in: Option<bool>,
}
