//! Warm pools - Pre-initialized standby capacity

use cirrus_core::expr::StringExpr;

use crate::cfn::warm_pool::CfnWarmPool;
use crate::types::PoolState;

use super::AutoScalingError;

/// Settings for a group's warm pool
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WarmPoolOptions {
    /// State instances wait in; the service defaults to stopped
    pub pool_state: Option<PoolState>,
    /// Instances kept warm even when the group is small
    pub min_size: Option<u32>,
    /// Cap on warm instances; -1 tracks the group's max size
    pub max_group_prepared_capacity: Option<i64>,
    /// Return scaled-in instances to the pool instead of terminating
    pub reuse_on_scale_in: Option<bool>,
}

impl WarmPoolOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_pool_state(mut self, state: PoolState) -> Self {
        self.pool_state = Some(state);
        self
    }

    pub fn with_min_size(mut self, min: u32) -> Self {
        self.min_size = Some(min);
        self
    }

    pub fn with_max_group_prepared_capacity(mut self, capacity: i64) -> Self {
        self.max_group_prepared_capacity = Some(capacity);
        self
    }

    pub fn with_reuse_on_scale_in(mut self, reuse: bool) -> Self {
        self.reuse_on_scale_in = Some(reuse);
        self
    }

    /// Validate and render into a warm pool attached to `group_name`
    pub fn render(&self, group_name: StringExpr) -> Result<CfnWarmPool, AutoScalingError> {
        if let Some(capacity) = self.max_group_prepared_capacity {
            if capacity < -1 {
                return Err(AutoScalingError::validation(format!(
                    "'max_group_prepared_capacity' must be -1 or greater, got {}",
                    capacity
                )));
            }
            if capacity != -1
                && let Some(min) = self.min_size
                && i64::from(min) > capacity
            {
                return Err(AutoScalingError::validation(format!(
                    "'max_group_prepared_capacity' ({}) must not be below 'min_size' ({})",
                    capacity, min
                )));
            }
        }
        if self.reuse_on_scale_in == Some(true) && self.pool_state == Some(PoolState::Hibernated) {
            return Err(AutoScalingError::validation(
                "hibernated warm pool instances cannot be reused on scale-in",
            ));
        }

        let mut pool = CfnWarmPool::new(group_name);
        if let Some(state) = self.pool_state {
            pool = pool.with_pool_state(state);
        }
        if let Some(min) = self.min_size {
            pool = pool.with_min_size(min);
        }
        if let Some(capacity) = self.max_group_prepared_capacity {
            pool = pool.with_max_group_prepared_capacity(capacity);
        }
        if let Some(reuse) = self.reuse_on_scale_in {
            pool = pool.with_instance_reuse(reuse);
        }
        Ok(pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_carries_settings() {
        let pool = WarmPoolOptions::new()
            .with_pool_state(PoolState::Running)
            .with_min_size(2)
            .with_max_group_prepared_capacity(8)
            .render("web".into())
            .unwrap();
        assert_eq!(pool.pool_state, Some(PoolState::Running));
        assert_eq!(pool.min_size, Some(2));
        assert_eq!(pool.max_group_prepared_capacity, Some(8));
    }

    #[test]
    fn capacity_below_negative_one_is_rejected() {
        let result = WarmPoolOptions::new()
            .with_max_group_prepared_capacity(-2)
            .render("web".into());
        assert!(result.is_err());
    }

    #[test]
    fn capacity_below_min_size_is_rejected() {
        let result = WarmPoolOptions::new()
            .with_min_size(5)
            .with_max_group_prepared_capacity(3)
            .render("web".into());
        assert!(result.is_err());
    }

    #[test]
    fn tracking_capacity_allows_any_min_size() {
        let result = WarmPoolOptions::new()
            .with_min_size(5)
            .with_max_group_prepared_capacity(-1)
            .render("web".into());
        assert!(result.is_ok());
    }

    #[test]
    fn hibernated_reuse_is_rejected() {
        let result = WarmPoolOptions::new()
            .with_pool_state(PoolState::Hibernated)
            .with_reuse_on_scale_in(true)
            .render("web".into());
        assert!(matches!(result, Err(AutoScalingError::Validation(_))));
    }
}
