//! Step scaling - Interval-driven policies wired to CloudWatch alarms
//!
//! Takes a declared set of scaling intervals, normalizes them, and emits
//! up to two step policies: one below the gap (scale in) triggered by a
//! less-than alarm, one above it (scale out) triggered by a greater-than
//! alarm. Step adjustment bounds are expressed relative to the alarm
//! threshold, as the scaling API expects.

use cirrus_core::duration::Duration;
use cirrus_core::expr::StringExpr;
use cirrus_core::resource::LogicalId;

use crate::cfn::alarm::CfnAlarm;
use crate::cfn::scaling_policy::{CfnScalingPolicy, StepAdjustment};
use crate::intervals::{CompleteScalingInterval, ScalingInterval, find_alarm_thresholds, normalize_intervals};
use crate::types::{
    AdjustmentType, ComparisonOperator, MetricAggregationType, MetricStatistic, PolicyType,
};

use super::AutoScalingError;

/// Default alarm period when the metric does not specify one
const DEFAULT_PERIOD: Duration = Duration::minutes(5);

/// The CloudWatch metric a step policy watches
#[derive(Debug, Clone, PartialEq)]
pub struct StepMetric {
    pub namespace: String,
    pub metric_name: String,
    pub statistic: MetricStatistic,
    pub dimensions: Vec<(String, StringExpr)>,
    pub period: Option<Duration>,
}

impl StepMetric {
    pub fn new(
        namespace: impl Into<String>,
        metric_name: impl Into<String>,
        statistic: MetricStatistic,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            metric_name: metric_name.into(),
            statistic,
            dimensions: Vec::new(),
            period: None,
        }
    }

    pub fn with_dimension(mut self, name: impl Into<String>, value: impl Into<StringExpr>) -> Self {
        self.dimensions.push((name.into(), value.into()));
        self
    }

    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = Some(period);
        self
    }
}

/// Settings for a step scaling policy
#[derive(Debug, Clone, PartialEq)]
pub struct StepScalingProps {
    pub metric: StepMetric,
    pub scaling_steps: Vec<ScalingInterval>,
    pub adjustment_type: Option<AdjustmentType>,
    pub cooldown: Option<Duration>,
    pub estimated_instance_warmup: Option<Duration>,
    pub evaluation_periods: Option<u32>,
    pub metric_aggregation_type: Option<MetricAggregationType>,
    pub min_adjustment_magnitude: Option<i32>,
}

impl StepScalingProps {
    pub fn new(metric: StepMetric, scaling_steps: Vec<ScalingInterval>) -> Self {
        Self {
            metric,
            scaling_steps,
            adjustment_type: None,
            cooldown: None,
            estimated_instance_warmup: None,
            evaluation_periods: None,
            metric_aggregation_type: None,
            min_adjustment_magnitude: None,
        }
    }
}

/// Rendered step scaling resources, ready to add to a template
#[derive(Debug, Clone, PartialEq)]
pub struct StepScalingPolicy {
    pub lower_policy: Option<(LogicalId, CfnScalingPolicy)>,
    pub lower_alarm: Option<(LogicalId, CfnAlarm)>,
    pub upper_policy: Option<(LogicalId, CfnScalingPolicy)>,
    pub upper_alarm: Option<(LogicalId, CfnAlarm)>,
}

impl StepScalingPolicy {
    /// Normalize the declared intervals and render policies and alarms
    ///
    /// `base_id` scopes the logical IDs of the four resources;
    /// `group_name` is what the policies attach to.
    pub fn new(
        base_id: &LogicalId,
        group_name: StringExpr,
        props: &StepScalingProps,
    ) -> Result<Self, AutoScalingError> {
        let adjustment_type = props
            .adjustment_type
            .unwrap_or(AdjustmentType::ChangeInCapacity);

        if adjustment_type == AdjustmentType::PercentChangeInCapacity {
            for step in &props.scaling_steps {
                if !(-100..=100).contains(&step.change) {
                    return Err(AutoScalingError::validation(format!(
                        "percentage changes must be between -100 and 100, got {}",
                        step.change
                    )));
                }
            }
        }
        if props.min_adjustment_magnitude.is_some()
            && adjustment_type != AdjustmentType::PercentChangeInCapacity
        {
            return Err(AutoScalingError::validation(
                "'min_adjustment_magnitude' only applies to percentage changes",
            ));
        }

        let intervals = normalize_intervals(&props.scaling_steps)?;
        let thresholds = find_alarm_thresholds(&intervals)?;

        let mut rendered = Self {
            lower_policy: None,
            lower_alarm: None,
            upper_policy: None,
            upper_alarm: None,
        };

        if let Some(index) = thresholds.lower_alarm_index {
            let threshold = intervals[index].upper;
            let steps = relative_adjustments(&intervals[..=index], threshold, Edge::Lower);
            let policy_id = base_id.child("lower-policy");
            let policy = render_policy(group_name.clone(), adjustment_type, steps, props);
            let alarm = render_alarm(
                props,
                threshold,
                ComparisonOperator::LessThanOrEqualToThreshold,
                &policy_id,
            )
            .with_description(format!("Scale in when {} <= {}", props.metric.metric_name, threshold));
            rendered.lower_alarm = Some((base_id.child("lower-alarm"), alarm));
            rendered.lower_policy = Some((policy_id, policy));
        }

        if let Some(index) = thresholds.upper_alarm_index {
            let threshold = intervals[index].lower;
            let steps = relative_adjustments(&intervals[index..], threshold, Edge::Upper);
            let policy_id = base_id.child("upper-policy");
            let policy = render_policy(group_name, adjustment_type, steps, props);
            let alarm = render_alarm(
                props,
                threshold,
                ComparisonOperator::GreaterThanOrEqualToThreshold,
                &policy_id,
            )
            .with_description(format!("Scale out when {} >= {}", props.metric.metric_name, threshold));
            rendered.upper_alarm = Some((base_id.child("upper-alarm"), alarm));
            rendered.upper_policy = Some((policy_id, policy));
        }

        Ok(rendered)
    }
}

enum Edge {
    Lower,
    Upper,
}

/// Express interval bounds relative to the alarm threshold; the outermost
/// bound on each side stays open
fn relative_adjustments(
    intervals: &[CompleteScalingInterval],
    threshold: f64,
    edge: Edge,
) -> Vec<StepAdjustment> {
    let last = intervals.len() - 1;
    intervals
        .iter()
        .enumerate()
        .filter_map(|(i, interval)| {
            let change = interval.change?;
            let (lower, upper) = match edge {
                Edge::Lower => (
                    (i > 0).then(|| interval.lower - threshold),
                    Some(interval.upper - threshold),
                ),
                Edge::Upper => (
                    Some(interval.lower - threshold),
                    (i < last).then(|| interval.upper - threshold),
                ),
            };
            Some(StepAdjustment {
                metric_interval_lower_bound: lower,
                metric_interval_upper_bound: upper,
                scaling_adjustment: change,
            })
        })
        .collect()
}

fn render_policy(
    group_name: StringExpr,
    adjustment_type: AdjustmentType,
    steps: Vec<StepAdjustment>,
    props: &StepScalingProps,
) -> CfnScalingPolicy {
    let aggregation = props.metric_aggregation_type.or(match props.metric.statistic {
        MetricStatistic::Average => Some(MetricAggregationType::Average),
        MetricStatistic::Minimum => Some(MetricAggregationType::Minimum),
        MetricStatistic::Maximum => Some(MetricAggregationType::Maximum),
        _ => None,
    });

    let mut policy = CfnScalingPolicy::new(group_name)
        .with_policy_type(PolicyType::StepScaling)
        .with_adjustment_type(adjustment_type);
    for step in steps {
        policy = policy.with_step_adjustment(step);
    }
    if let Some(aggregation) = aggregation {
        policy = policy.with_metric_aggregation_type(aggregation);
    }
    if let Some(cooldown) = props.cooldown {
        policy = policy.with_cooldown_secs(cooldown.as_secs());
    }
    if let Some(warmup) = props.estimated_instance_warmup {
        policy = policy.with_estimated_instance_warmup(warmup.as_secs() as i64);
    }
    if let Some(magnitude) = props.min_adjustment_magnitude {
        policy = policy.with_min_adjustment_magnitude(magnitude);
    }
    policy
}

fn render_alarm(
    props: &StepScalingProps,
    threshold: f64,
    comparison: ComparisonOperator,
    policy_id: &LogicalId,
) -> CfnAlarm {
    let mut alarm = CfnAlarm::new(comparison, props.evaluation_periods.unwrap_or(1))
        .with_metric(props.metric.namespace.clone(), props.metric.metric_name.clone())
        .with_statistic(props.metric.statistic)
        .with_period_secs(props.metric.period.unwrap_or(DEFAULT_PERIOD).as_secs() as u32)
        .with_threshold(threshold)
        .with_alarm_action(StringExpr::reference(policy_id));
    for (name, value) in &props.metric.dimensions {
        alarm = alarm.with_dimension(name.clone(), value.clone());
    }
    alarm
}
