//! Scaling interval normalization
//!
//! Step scaling is declared as a set of metric ranges with capacity
//! changes. Before rendering into step adjustments and alarm thresholds
//! the set is completed: missing bounds are derived from neighbours,
//! uncovered ranges become no-change intervals, and the result is a
//! contiguous, validated cover of `[0, +inf)`.

use std::cmp::Ordering;

use thiserror::Error;

/// A metric range and the capacity adjustment to apply inside it
///
/// At least one bound must be given; the missing one is derived from the
/// neighbouring intervals (0 at the left edge, unbounded at the right).
/// How `change` is interpreted depends on the adjustment type: a delta,
/// a percentage of current capacity, or an exact capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalingInterval {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
    pub change: i32,
}

impl ScalingInterval {
    /// Apply `change` whenever the metric is at or above `lower`
    pub fn at_or_above(lower: f64, change: i32) -> Self {
        Self {
            lower: Some(lower),
            upper: None,
            change,
        }
    }

    /// Apply `change` whenever the metric is below `upper`
    pub fn at_or_below(upper: f64, change: i32) -> Self {
        Self {
            lower: None,
            upper: Some(upper),
            change,
        }
    }

    /// Apply `change` whenever the metric is within `[lower, upper)`
    pub fn between(lower: f64, upper: f64, change: i32) -> Self {
        Self {
            lower: Some(lower),
            upper: Some(upper),
            change,
        }
    }
}

/// An interval with both bounds resolved; `change: None` marks a range
/// where capacity is left alone
#[derive(Debug, Clone, PartialEq)]
pub struct CompleteScalingInterval {
    pub lower: f64,
    pub upper: f64,
    pub change: Option<i32>,
}

/// Indexes of the intervals carrying the alarm thresholds
///
/// The interval left of the no-change gap holds the lower alarm threshold
/// (its upper bound); the interval right of the gap holds the upper alarm
/// threshold (its lower bound). A side is `None` when the gap touches
/// that edge of the number line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlarmThresholdIndexes {
    pub lower_alarm_index: Option<usize>,
    pub upper_alarm_index: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntervalError {
    #[error("at least one scaling interval is required")]
    Empty,

    #[error("a scaling interval needs a lower or an upper bound")]
    Unbounded,

    #[error("scaling interval bounds must be non-negative, got {0}")]
    NegativeBound(f64),

    #[error("scaling interval bounds must satisfy lower < upper, got [{lower}, {upper})")]
    InvertedBounds { lower: f64, upper: f64 },

    #[error("scaling interval bounds could not be derived from neighbouring intervals")]
    UnderspecifiedBounds,

    #[error("scaling intervals overlap around {0}")]
    Overlap(f64),

    #[error("every metric value has a capacity change; leave a range open to hold the alarm thresholds")]
    NoGap,

    #[error("scaling intervals leave more than one metric range without a capacity change")]
    MultipleGaps,

    #[error("scaling intervals contain no capacity change")]
    NoChange,
}

/// Complete, order and validate a set of scaling intervals
///
/// The result is sorted, non-overlapping and covers `[0, +inf)`; ranges
/// the input left uncovered (and zero changes) come back as no-change
/// intervals, with adjacent no-change intervals merged.
pub fn normalize_intervals(
    intervals: &[ScalingInterval],
) -> Result<Vec<CompleteScalingInterval>, IntervalError> {
    if intervals.is_empty() {
        return Err(IntervalError::Empty);
    }
    for interval in intervals {
        if interval.lower.is_none() && interval.upper.is_none() {
            return Err(IntervalError::Unbounded);
        }
        for bound in [interval.lower, interval.upper].into_iter().flatten() {
            if bound < 0.0 {
                return Err(IntervalError::NegativeBound(bound));
            }
        }
        if let (Some(lower), Some(upper)) = (interval.lower, interval.upper)
            && lower >= upper
        {
            return Err(IntervalError::InvertedBounds { lower, upper });
        }
    }

    let mut sorted = intervals.to_vec();
    sorted.sort_by(|a, b| {
        let key_a = (
            a.lower.unwrap_or(f64::NEG_INFINITY),
            a.upper.unwrap_or(f64::INFINITY),
        );
        let key_b = (
            b.lower.unwrap_or(f64::NEG_INFINITY),
            b.upper.unwrap_or(f64::INFINITY),
        );
        key_a.partial_cmp(&key_b).unwrap_or(Ordering::Equal)
    });

    // Derive missing lower bounds left to right, then missing upper
    // bounds right to left. Sorting guarantees open-lower intervals come
    // first, so the neighbour a bound is taken from has it resolved.
    let mut lowers = Vec::with_capacity(sorted.len());
    for (i, interval) in sorted.iter().enumerate() {
        let lower = match interval.lower {
            Some(lower) => lower,
            None if i == 0 => 0.0,
            None => sorted[i - 1]
                .upper
                .ok_or(IntervalError::UnderspecifiedBounds)?,
        };
        lowers.push(lower);
    }
    let mut uppers = vec![0.0; sorted.len()];
    for i in (0..sorted.len()).rev() {
        uppers[i] = match sorted[i].upper {
            Some(upper) => upper,
            None if i == sorted.len() - 1 => f64::INFINITY,
            None => lowers[i + 1],
        };
    }

    let mut completed = Vec::with_capacity(sorted.len());
    for (i, interval) in sorted.iter().enumerate() {
        if lowers[i] >= uppers[i] {
            return Err(IntervalError::InvertedBounds {
                lower: lowers[i],
                upper: uppers[i],
            });
        }
        completed.push(CompleteScalingInterval {
            lower: lowers[i],
            upper: uppers[i],
            change: (interval.change != 0).then_some(interval.change),
        });
    }

    // Fill uncovered ranges with no-change intervals and reject overlaps
    let mut full: Vec<CompleteScalingInterval> = Vec::new();
    let mut covered_to = 0.0_f64;
    for interval in completed {
        match interval.lower.partial_cmp(&covered_to) {
            Some(Ordering::Greater) => full.push(CompleteScalingInterval {
                lower: covered_to,
                upper: interval.lower,
                change: None,
            }),
            Some(Ordering::Less) => return Err(IntervalError::Overlap(interval.lower)),
            _ => {}
        }
        covered_to = interval.upper;
        full.push(interval);
    }
    if covered_to.is_finite() {
        full.push(CompleteScalingInterval {
            lower: covered_to,
            upper: f64::INFINITY,
            change: None,
        });
    }

    // Merge adjacent no-change intervals
    let mut merged: Vec<CompleteScalingInterval> = Vec::with_capacity(full.len());
    for interval in full {
        match merged.last_mut() {
            Some(last) if last.change.is_none() && interval.change.is_none() => {
                last.upper = interval.upper;
            }
            _ => merged.push(interval),
        }
    }

    Ok(merged)
}

/// Locate the single no-change gap and the intervals flanking it
pub fn find_alarm_thresholds(
    intervals: &[CompleteScalingInterval],
) -> Result<AlarmThresholdIndexes, IntervalError> {
    let gaps: Vec<usize> = intervals
        .iter()
        .enumerate()
        .filter(|(_, interval)| interval.change.is_none())
        .map(|(i, _)| i)
        .collect();

    match gaps.as_slice() {
        [] => Err(IntervalError::NoGap),
        [gap] => {
            let lower_alarm_index = gap.checked_sub(1);
            let upper_alarm_index = (gap + 1 < intervals.len()).then_some(gap + 1);
            if lower_alarm_index.is_none() && upper_alarm_index.is_none() {
                return Err(IntervalError::NoChange);
            }
            Ok(AlarmThresholdIndexes {
                lower_alarm_index,
                upper_alarm_index,
            })
        }
        _ => Err(IntervalError::MultipleGaps),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete(lower: f64, upper: f64, change: Option<i32>) -> CompleteScalingInterval {
        CompleteScalingInterval {
            lower,
            upper,
            change,
        }
    }

    #[test]
    fn two_sided_intervals_get_a_middle_gap() {
        let normalized = normalize_intervals(&[
            ScalingInterval::at_or_below(10.0, -1),
            ScalingInterval::at_or_above(50.0, 1),
        ])
        .unwrap();

        assert_eq!(
            normalized,
            vec![
                complete(0.0, 10.0, Some(-1)),
                complete(10.0, 50.0, None),
                complete(50.0, f64::INFINITY, Some(1)),
            ]
        );
    }

    #[test]
    fn contiguous_steps_keep_their_bounds() {
        let normalized = normalize_intervals(&[
            ScalingInterval::at_or_below(5.0, -2),
            ScalingInterval::between(5.0, 10.0, -1),
            ScalingInterval::between(70.0, 90.0, 1),
            ScalingInterval::at_or_above(90.0, 3),
        ])
        .unwrap();

        assert_eq!(
            normalized,
            vec![
                complete(0.0, 5.0, Some(-2)),
                complete(5.0, 10.0, Some(-1)),
                complete(10.0, 70.0, None),
                complete(70.0, 90.0, Some(1)),
                complete(90.0, f64::INFINITY, Some(3)),
            ]
        );
    }

    #[test]
    fn input_order_does_not_matter() {
        let a = normalize_intervals(&[
            ScalingInterval::at_or_above(50.0, 1),
            ScalingInterval::at_or_below(10.0, -1),
        ])
        .unwrap();
        let b = normalize_intervals(&[
            ScalingInterval::at_or_below(10.0, -1),
            ScalingInterval::at_or_above(50.0, 1),
        ])
        .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn one_sided_scale_out_leaves_gap_at_origin() {
        let normalized = normalize_intervals(&[ScalingInterval::at_or_above(50.0, 1)]).unwrap();
        assert_eq!(
            normalized,
            vec![
                complete(0.0, 50.0, None),
                complete(50.0, f64::INFINITY, Some(1)),
            ]
        );

        let thresholds = find_alarm_thresholds(&normalized).unwrap();
        assert_eq!(thresholds.lower_alarm_index, None);
        assert_eq!(thresholds.upper_alarm_index, Some(1));
    }

    #[test]
    fn zero_change_folds_into_the_gap() {
        let normalized = normalize_intervals(&[
            ScalingInterval::at_or_below(30.0, 0),
            ScalingInterval::at_or_above(70.0, 1),
        ])
        .unwrap();
        assert_eq!(
            normalized,
            vec![
                complete(0.0, 70.0, None),
                complete(70.0, f64::INFINITY, Some(1)),
            ]
        );
    }

    #[test]
    fn alarm_thresholds_flank_the_gap() {
        let normalized = normalize_intervals(&[
            ScalingInterval::at_or_below(10.0, -1),
            ScalingInterval::at_or_above(50.0, 1),
        ])
        .unwrap();

        let thresholds = find_alarm_thresholds(&normalized).unwrap();
        assert_eq!(thresholds.lower_alarm_index, Some(0));
        assert_eq!(thresholds.upper_alarm_index, Some(2));
        assert_eq!(normalized[0].upper, 10.0);
        assert_eq!(normalized[2].lower, 50.0);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(normalize_intervals(&[]), Err(IntervalError::Empty));
    }

    #[test]
    fn interval_without_bounds_is_rejected() {
        let interval = ScalingInterval {
            lower: None,
            upper: None,
            change: 1,
        };
        assert_eq!(
            normalize_intervals(&[interval]),
            Err(IntervalError::Unbounded)
        );
    }

    #[test]
    fn negative_bound_is_rejected() {
        assert_eq!(
            normalize_intervals(&[ScalingInterval::at_or_above(-5.0, 1)]),
            Err(IntervalError::NegativeBound(-5.0))
        );
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        assert_eq!(
            normalize_intervals(&[ScalingInterval::between(10.0, 10.0, 1)]),
            Err(IntervalError::InvertedBounds {
                lower: 10.0,
                upper: 10.0
            })
        );
    }

    #[test]
    fn overlapping_intervals_are_rejected() {
        let result = normalize_intervals(&[
            ScalingInterval::between(0.0, 30.0, -1),
            ScalingInterval::between(20.0, 50.0, -2),
            ScalingInterval::at_or_above(80.0, 1),
        ]);
        assert_eq!(result, Err(IntervalError::Overlap(20.0)));
    }

    #[test]
    fn full_cover_has_no_room_for_alarms() {
        let normalized = normalize_intervals(&[
            ScalingInterval::at_or_below(50.0, -1),
            ScalingInterval::at_or_above(50.0, 1),
        ])
        .unwrap();
        assert_eq!(
            find_alarm_thresholds(&normalized),
            Err(IntervalError::NoGap)
        );
    }

    #[test]
    fn two_gaps_are_rejected() {
        let normalized = normalize_intervals(&[
            ScalingInterval::between(10.0, 20.0, -1),
            ScalingInterval::at_or_above(60.0, 1),
        ])
        .unwrap();
        assert_eq!(
            find_alarm_thresholds(&normalized),
            Err(IntervalError::MultipleGaps)
        );
    }

    #[test]
    fn all_quiet_means_no_change_at_all() {
        let normalized = normalize_intervals(&[ScalingInterval::at_or_below(10.0, 0)]).unwrap();
        assert_eq!(
            find_alarm_thresholds(&normalized),
            Err(IntervalError::NoChange)
        );
    }
}
