//! Stack manifest - Declarative description of an auto scaling stack
//!
//! The manifest is the CLI's input format: a JSON document naming the
//! groups to synthesize, their instance configuration and their scaling
//! behavior. Unknown fields are rejected so typos surface early.

use std::collections::BTreeMap;

use serde::Deserialize;

use cirrus_autoscaling::constructs::auto_scaling_group::AutoScalingGroup;
use cirrus_autoscaling::constructs::scheduled_action::ScheduledScalingProps;
use cirrus_autoscaling::constructs::target_tracking::TargetTrackingOptions;
use cirrus_autoscaling::constructs::warm_pool::WarmPoolOptions;
use cirrus_autoscaling::types::PoolState;
use cirrus_autoscaling::{AutoScalingError, Schedule};
use cirrus_core::template::Template;

/// Top-level manifest
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StackManifest {
    #[serde(default)]
    pub description: Option<String>,
    pub groups: Vec<GroupManifest>,
}

/// One auto scaling group
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupManifest {
    pub name: String,
    pub image_id: String,
    pub instance_type: String,
    #[serde(default = "default_capacity")]
    pub min_capacity: u32,
    #[serde(default = "default_capacity")]
    pub max_capacity: u32,
    #[serde(default)]
    pub desired_capacity: Option<u32>,
    #[serde(default)]
    pub subnets: Vec<String>,
    #[serde(default)]
    pub availability_zones: Vec<String>,
    #[serde(default)]
    pub security_groups: Vec<String>,
    #[serde(default)]
    pub key_name: Option<String>,
    #[serde(default)]
    pub user_data: Option<String>,
    /// Target tracking on average CPU, as a percentage
    #[serde(default)]
    pub cpu_target_percent: Option<f64>,
    #[serde(default)]
    pub schedules: Vec<ScheduleManifest>,
    #[serde(default)]
    pub warm_pool: Option<WarmPoolManifest>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

fn default_capacity() -> u32 {
    1
}

/// A scheduled capacity change
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScheduleManifest {
    pub name: String,
    /// Five-field cron expression
    pub cron: String,
    #[serde(default)]
    pub min_capacity: Option<u32>,
    #[serde(default)]
    pub max_capacity: Option<u32>,
    #[serde(default)]
    pub desired_capacity: Option<u32>,
    #[serde(default)]
    pub time_zone: Option<String>,
}

/// Warm pool settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WarmPoolManifest {
    #[serde(default)]
    pub min_size: Option<u32>,
    #[serde(default)]
    pub max_group_prepared_capacity: Option<i64>,
    /// One of `Hibernated`, `Running`, `Stopped`
    #[serde(default)]
    pub pool_state: Option<String>,
    #[serde(default)]
    pub reuse_on_scale_in: Option<bool>,
}

/// Build the template described by the manifest
pub fn synthesize(manifest: &StackManifest) -> Result<Template, AutoScalingError> {
    let mut template = Template::new();
    if let Some(description) = &manifest.description {
        template = template.with_description(description.clone());
    }

    for group_manifest in &manifest.groups {
        let group = build_group(group_manifest)?;
        group.add_to(&mut template)?;
    }

    Ok(template)
}

fn build_group(manifest: &GroupManifest) -> Result<AutoScalingGroup, AutoScalingError> {
    let mut group = AutoScalingGroup::new(
        &manifest.name,
        &manifest.image_id,
        &manifest.instance_type,
    )
    .with_capacity(manifest.min_capacity, manifest.max_capacity)
    .with_subnets(manifest.subnets.clone())
    .with_availability_zones(manifest.availability_zones.clone());

    if let Some(desired) = manifest.desired_capacity {
        group = group.with_desired_capacity(desired);
    }
    for security_group in &manifest.security_groups {
        group = group.with_security_group(security_group.as_str());
    }
    if let Some(key_name) = &manifest.key_name {
        group = group.with_key_name(key_name.clone());
    }
    if let Some(user_data) = &manifest.user_data {
        group = group.with_user_data(user_data.clone());
    }
    for (key, value) in &manifest.tags {
        group = group.with_tag(key.clone(), value.clone());
    }

    if let Some(target) = manifest.cpu_target_percent {
        group.scale_on_cpu_utilization("cpu-tracking", target, TargetTrackingOptions::default());
    }

    for schedule in &manifest.schedules {
        let mut props = ScheduledScalingProps::new(Schedule::expression(&schedule.cron));
        if let Some(min) = schedule.min_capacity {
            props = props.with_min_capacity(min);
        }
        if let Some(max) = schedule.max_capacity {
            props = props.with_max_capacity(max);
        }
        if let Some(desired) = schedule.desired_capacity {
            props = props.with_desired_capacity(desired);
        }
        if let Some(time_zone) = &schedule.time_zone {
            props = props.with_time_zone(time_zone.clone());
        }
        group.scale_on_schedule(&schedule.name, props)?;
    }

    if let Some(warm_pool) = &manifest.warm_pool {
        let mut options = WarmPoolOptions::new();
        if let Some(min) = warm_pool.min_size {
            options = options.with_min_size(min);
        }
        if let Some(capacity) = warm_pool.max_group_prepared_capacity {
            options = options.with_max_group_prepared_capacity(capacity);
        }
        if let Some(state) = &warm_pool.pool_state {
            options = options.with_pool_state(parse_pool_state(state)?);
        }
        if let Some(reuse) = warm_pool.reuse_on_scale_in {
            options = options.with_reuse_on_scale_in(reuse);
        }
        group.add_warm_pool(options)?;
    }

    Ok(group)
}

fn parse_pool_state(state: &str) -> Result<PoolState, AutoScalingError> {
    match state {
        "Hibernated" => Ok(PoolState::Hibernated),
        "Running" => Ok(PoolState::Running),
        "Stopped" => Ok(PoolState::Stopped),
        other => Err(AutoScalingError::validation(format!(
            "unknown pool state '{}', expected one of: Hibernated, Running, Stopped",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_manifest() -> &'static str {
        r#"{
            "groups": [
                {
                    "name": "web",
                    "image_id": "ami-12345678",
                    "instance_type": "t3.micro",
                    "min_capacity": 2,
                    "max_capacity": 10
                }
            ]
        }"#
    }

    #[test]
    fn minimal_manifest_parses_and_synthesizes() {
        let manifest: StackManifest = serde_json::from_str(minimal_manifest()).unwrap();
        let template = synthesize(&manifest).unwrap();
        let doc = template.synth();
        assert_eq!(
            doc["Resources"]["Web"]["Type"],
            "AWS::AutoScaling::AutoScalingGroup"
        );
        assert_eq!(
            doc["Resources"]["WebLaunchConfig"]["Type"],
            "AWS::AutoScaling::LaunchConfiguration"
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<StackManifest, _> = serde_json::from_str(
            r#"{"groups": [], "grups": []}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn capacities_default_to_one() {
        let manifest: StackManifest = serde_json::from_str(
            r#"{"groups": [{"name": "api", "image_id": "ami-1", "instance_type": "t3.micro"}]}"#,
        )
        .unwrap();
        assert_eq!(manifest.groups[0].min_capacity, 1);
        assert_eq!(manifest.groups[0].max_capacity, 1);
    }

    #[test]
    fn cpu_target_and_schedule_render_policies() {
        let manifest: StackManifest = serde_json::from_str(
            r#"{
                "description": "web tier",
                "groups": [
                    {
                        "name": "web",
                        "image_id": "ami-1",
                        "instance_type": "t3.micro",
                        "min_capacity": 2,
                        "max_capacity": 10,
                        "cpu_target_percent": 55.0,
                        "schedules": [
                            {"name": "business-hours", "cron": "0 8 * * 1-5", "min_capacity": 5}
                        ],
                        "tags": {"team": "platform"}
                    }
                ]
            }"#,
        )
        .unwrap();

        let doc = synthesize(&manifest).unwrap().synth();
        assert_eq!(doc["Description"], "web tier");
        assert_eq!(
            doc["Resources"]["WebCpuTracking"]["Properties"]["PolicyType"],
            "TargetTrackingScaling"
        );
        assert_eq!(
            doc["Resources"]["WebBusinessHours"]["Properties"]["Recurrence"],
            "0 8 * * 1-5"
        );
        assert_eq!(
            doc["Resources"]["Web"]["Properties"]["Tags"][0]["Key"],
            "team"
        );
    }

    #[test]
    fn warm_pool_manifest_renders_pool() {
        let manifest: StackManifest = serde_json::from_str(
            r#"{
                "groups": [
                    {
                        "name": "web",
                        "image_id": "ami-1",
                        "instance_type": "t3.micro",
                        "warm_pool": {"min_size": 1, "pool_state": "Stopped"}
                    }
                ]
            }"#,
        )
        .unwrap();
        let doc = synthesize(&manifest).unwrap().synth();
        assert_eq!(
            doc["Resources"]["WebWarmPool"]["Properties"]["PoolState"],
            "Stopped"
        );
    }

    #[test]
    fn bad_pool_state_is_reported() {
        let manifest: StackManifest = serde_json::from_str(
            r#"{
                "groups": [
                    {
                        "name": "web",
                        "image_id": "ami-1",
                        "instance_type": "t3.micro",
                        "warm_pool": {"pool_state": "Sleeping"}
                    }
                ]
            }"#,
        )
        .unwrap();
        assert!(synthesize(&manifest).is_err());
    }

    #[test]
    fn invalid_group_capacity_fails_synthesis() {
        let manifest: StackManifest = serde_json::from_str(
            r#"{
                "groups": [
                    {
                        "name": "web",
                        "image_id": "ami-1",
                        "instance_type": "t3.micro",
                        "min_capacity": 5,
                        "max_capacity": 2
                    }
                ]
            }"#,
        )
        .unwrap();
        assert!(synthesize(&manifest).is_err());
    }
}
