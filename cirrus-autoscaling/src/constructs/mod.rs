//! Constructs - Helpers that assemble Auto Scaling template fragments
//!
//! Constructs sit above the raw resource property bags: they hold the
//! decisions (signal counts, rolling update batches, scaling intervals,
//! schedule expressions) and render them into wired-together resources.

pub mod auto_scaling_group;
pub mod lifecycle_hook;
pub mod schedule;
pub mod scheduled_action;
pub mod signals;
pub mod step_scaling_policy;
pub mod target_tracking;
pub mod update_policy;
pub mod volume;
pub mod warm_pool;

use cirrus_core::template::TemplateError;
use thiserror::Error;

use crate::intervals::IntervalError;

/// Error raised while assembling Auto Scaling constructs
#[derive(Debug, Error)]
pub enum AutoScalingError {
    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error(transparent)]
    Interval(#[from] IntervalError),

    #[error("{0}")]
    Validation(String),
}

impl AutoScalingError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}
