use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::watch::status::{self, BuildState};

/// One entry of a branch's build list, most recent first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeBuild {
    pub build_num: u32,
    #[serde(default)]
    pub build_url: String,
    #[serde(rename = "compare", default)]
    pub compare_url: Option<String>,
    /// Snapshot of the build that ran before this one on the same branch
    #[serde(default)]
    pub previous: Option<PreviousBuild>,
    #[serde(default)]
    pub queued_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub usage_queued_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub stop_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reponame: String,
    #[serde(default)]
    pub username: String,
    pub status: String,
    #[serde(default)]
    pub vcs_revision: String,
}

impl TreeBuild {
    pub fn state(&self) -> BuildState {
        status::classify(&self.status)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviousBuild {
    pub build_num: u32,
    pub status: String,
    #[serde(
        rename = "build_time_millis",
        default,
        deserialize_with = "optional_millis"
    )]
    pub build_time: Option<Duration>,
}

impl PreviousBuild {
    /// Duration of the previous build, if it passed and recorded one.
    pub fn successful_duration(&self) -> Option<Duration> {
        (status::classify(&self.status) == BuildState::Passed)
            .then_some(self.build_time)
            .flatten()
    }
}

/// A build with its step/container matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildDetail {
    pub build_num: u32,
    /// Number of containers; every step runs once per container
    #[serde(default = "default_parallel")]
    pub parallel: u32,
    #[serde(default)]
    pub steps: Vec<Step>,
}

fn default_parallel() -> u32 {
    1
}

impl BuildDetail {
    /// `(step, container)` pairs whose action failed, in step then container order.
    pub fn failures(&self) -> Vec<(usize, usize)> {
        self.steps
            .iter()
            .enumerate()
            .flat_map(|(i, step)| {
                step.actions
                    .iter()
                    .enumerate()
                    .filter(|(_, action)| action.failed())
                    .map(move |(j, _)| (i, j))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub name: String,
    #[serde(default)]
    pub actions: Vec<Action>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    #[serde(default)]
    pub status: String,
    #[serde(
        rename = "run_time_millis",
        default,
        deserialize_with = "millis"
    )]
    pub runtime: Duration,
    #[serde(default)]
    pub output_url: Option<String>,
}

impl Action {
    pub fn failed(&self) -> bool {
        status::action_failed(&self.status)
    }
}

/// A single timestamped chunk of step output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputChunk {
    pub message: String,
    pub time: Option<DateTime<Utc>>,
    #[serde(rename = "type", default)]
    pub kind: String,
}

fn millis<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_millis(deserializer)?.unwrap_or_default())
}

fn optional_millis<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: Deserializer<'de>,
{
    let millis = Option::<u64>::deserialize(deserializer)?;
    Ok(millis.map(Duration::from_millis))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_millis_deserialize_to_duration() {
        let action: Action =
            serde_json::from_str(r#"{"name": "make test", "status": "success", "run_time_millis": 345}"#)
                .unwrap();
        assert_eq!(action.runtime, Duration::from_millis(345));
    }

    #[test]
    fn test_null_runtime_is_zero() {
        let action: Action =
            serde_json::from_str(r#"{"name": "make test", "status": "running", "run_time_millis": null}"#)
                .unwrap();
        assert_eq!(action.runtime, Duration::ZERO);
    }

    #[test]
    fn test_tree_build_with_null_timestamps() {
        let json = r#"{
            "build_num": 11,
            "build_url": "https://circleci.com/gh/Shyp/go-circle/11",
            "compare": null,
            "previous": {"build_num": 10, "status": "success", "build_time_millis": 90000},
            "queued_at": "2016-06-01T18:00:00.000Z",
            "usage_queued_at": null,
            "start_time": null,
            "stop_time": null,
            "reponame": "go-circle",
            "username": "Shyp",
            "status": "queued",
            "vcs_revision": "1d79f2b877bfa6ab3de3d4b4a5ac7ee2f5c2f1f0"
        }"#;
        let build: TreeBuild = serde_json::from_str(json).unwrap();
        assert_eq!(build.state(), BuildState::Queued);
        assert!(build.queued_at.is_some());
        assert!(build.stop_time.is_none());
        assert_eq!(
            build.previous.unwrap().successful_duration(),
            Some(Duration::from_secs(90))
        );
    }

    #[test]
    fn test_failed_previous_build_has_no_reference_duration() {
        let previous = PreviousBuild {
            build_num: 3,
            status: "failed".to_string(),
            build_time: Some(Duration::from_secs(300)),
        };
        assert_eq!(previous.successful_duration(), None);
    }

    #[test]
    fn test_failures_enumerate_step_then_container() {
        let action = |status: &str| Action {
            name: "run".to_string(),
            status: status.to_string(),
            runtime: Duration::from_secs(1),
            output_url: None,
        };
        let build = BuildDetail {
            build_num: 7,
            parallel: 2,
            steps: vec![
                Step {
                    name: "checkout".to_string(),
                    actions: vec![action("success"), action("success")],
                },
                Step {
                    name: "test".to_string(),
                    actions: vec![action("timedout"), action("failed")],
                },
                Step {
                    name: "lint".to_string(),
                    actions: vec![action("success"), action("failed")],
                },
            ],
        };
        assert_eq!(build.failures(), vec![(1, 0), (1, 1), (2, 1)]);
    }
}
