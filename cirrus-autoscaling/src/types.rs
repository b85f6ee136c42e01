//! Auto Scaling value sets
//!
//! Closed sets of named constants mapping to the string literals the AWS
//! API accepts. Each serializes as its stable string value.

use std::fmt;

use serde::{Serialize, Serializer};

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident => $value:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// The string value the AWS API expects
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $value),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

string_enum! {
    /// Group-level CloudWatch metrics a group can publish
    GroupMetric {
        MinSize => "GroupMinSize",
        MaxSize => "GroupMaxSize",
        DesiredCapacity => "GroupDesiredCapacity",
        InServiceInstances => "GroupInServiceInstances",
        PendingInstances => "GroupPendingInstances",
        StandbyInstances => "GroupStandbyInstances",
        TerminatingInstances => "GroupTerminatingInstances",
        TotalInstances => "GroupTotalInstances",
        InServiceCapacity => "GroupInServiceCapacity",
        PendingCapacity => "GroupPendingCapacity",
        StandbyCapacity => "GroupStandbyCapacity",
        TerminatingCapacity => "GroupTerminatingCapacity",
        TotalCapacity => "GroupTotalCapacity",
    }
}

impl GroupMetric {
    /// Every group metric, for groups that publish them all
    pub fn all() -> Vec<GroupMetric> {
        vec![
            Self::MinSize,
            Self::MaxSize,
            Self::DesiredCapacity,
            Self::InServiceInstances,
            Self::PendingInstances,
            Self::StandbyInstances,
            Self::TerminatingInstances,
            Self::TotalInstances,
            Self::InServiceCapacity,
            Self::PendingCapacity,
            Self::StandbyCapacity,
            Self::TerminatingCapacity,
            Self::TotalCapacity,
        ]
    }
}

string_enum! {
    /// Order in which instances are picked for termination
    TerminationPolicy {
        AllocationStrategy => "AllocationStrategy",
        ClosestToNextInstanceHour => "ClosestToNextInstanceHour",
        Default => "Default",
        NewestInstance => "NewestInstance",
        OldestInstance => "OldestInstance",
        OldestLaunchConfiguration => "OldestLaunchConfiguration",
        OldestLaunchTemplate => "OldestLaunchTemplate",
    }
}

string_enum! {
    /// Group processes that can be suspended during updates
    ScalingProcess {
        Launch => "Launch",
        Terminate => "Terminate",
        HealthCheck => "HealthCheck",
        ReplaceUnhealthy => "ReplaceUnhealthy",
        AzRebalance => "AZRebalance",
        AlarmNotification => "AlarmNotification",
        ScheduledActions => "ScheduledActions",
        AddToLoadBalancer => "AddToLoadBalancer",
        InstanceRefresh => "InstanceRefresh",
    }
}

string_enum! {
    /// Instance state change a lifecycle hook pauses
    LifecycleTransition {
        InstanceLaunching => "autoscaling:EC2_INSTANCE_LAUNCHING",
        InstanceTerminating => "autoscaling:EC2_INSTANCE_TERMINATING",
    }
}

string_enum! {
    /// What the group does when a lifecycle hook times out
    DefaultResult {
        Continue => "CONTINUE",
        Abandon => "ABANDON",
    }
}

string_enum! {
    /// State warm pool instances are kept in
    PoolState {
        Hibernated => "Hibernated",
        Running => "Running",
        Stopped => "Stopped",
    }
}

string_enum! {
    /// How a scaling adjustment number is interpreted
    AdjustmentType {
        ChangeInCapacity => "ChangeInCapacity",
        ExactCapacity => "ExactCapacity",
        PercentChangeInCapacity => "PercentChangeInCapacity",
    }
}

string_enum! {
    /// Aggregation applied to metric data points across a step policy's period
    MetricAggregationType {
        Average => "Average",
        Minimum => "Minimum",
        Maximum => "Maximum",
    }
}

string_enum! {
    /// Statistic of a customized metric
    MetricStatistic {
        Average => "Average",
        Minimum => "Minimum",
        Maximum => "Maximum",
        SampleCount => "SampleCount",
        Sum => "Sum",
    }
}

string_enum! {
    /// Kind of scaling policy
    PolicyType {
        SimpleScaling => "SimpleScaling",
        StepScaling => "StepScaling",
        TargetTrackingScaling => "TargetTrackingScaling",
        PredictiveScaling => "PredictiveScaling",
    }
}

string_enum! {
    /// Predefined metrics usable for target tracking
    PredefinedMetricType {
        AverageCpuUtilization => "ASGAverageCPUUtilization",
        AverageNetworkIn => "ASGAverageNetworkIn",
        AverageNetworkOut => "ASGAverageNetworkOut",
        AlbRequestCountPerTarget => "ALBRequestCountPerTarget",
    }
}

string_enum! {
    /// Predefined metric pairs usable for predictive scaling
    PredictiveScalingMetricPair {
        CpuUtilization => "ASGCPUUtilization",
        NetworkIn => "ASGNetworkIn",
        NetworkOut => "ASGNetworkOut",
        AlbRequestCount => "ALBRequestCount",
    }
}

string_enum! {
    /// Health check source for group instances
    HealthCheckType {
        Ec2 => "EC2",
        Elb => "ELB",
    }
}

string_enum! {
    /// Group state change notifications
    ScalingEvent {
        InstanceLaunch => "autoscaling:EC2_INSTANCE_LAUNCH",
        InstanceLaunchError => "autoscaling:EC2_INSTANCE_LAUNCH_ERROR",
        InstanceTerminate => "autoscaling:EC2_INSTANCE_TERMINATE",
        InstanceTerminateError => "autoscaling:EC2_INSTANCE_TERMINATE_ERROR",
        TestNotification => "autoscaling:TEST_NOTIFICATION",
    }
}

string_enum! {
    /// EBS volume types
    EbsDeviceVolumeType {
        Standard => "standard",
        Io1 => "io1",
        Io2 => "io2",
        Gp2 => "gp2",
        Gp3 => "gp3",
        St1 => "st1",
        Sc1 => "sc1",
    }
}

string_enum! {
    /// Alarm comparison operators used by step scaling
    ComparisonOperator {
        GreaterThanOrEqualToThreshold => "GreaterThanOrEqualToThreshold",
        GreaterThanThreshold => "GreaterThanThreshold",
        LessThanThreshold => "LessThanThreshold",
        LessThanOrEqualToThreshold => "LessThanOrEqualToThreshold",
    }
}

/// Level of CloudWatch monitoring for launched instances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Monitoring {
    /// Five-minute metrics, free
    Basic,
    /// One-minute metrics
    Detailed,
}

impl Monitoring {
    /// Value of the launch configuration's `InstanceMonitoring` flag
    pub fn enabled(&self) -> bool {
        matches!(self, Self::Detailed)
    }
}
