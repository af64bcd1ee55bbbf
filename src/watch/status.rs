use std::fmt;

/// Category a raw CircleCI status token falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildState {
    Queued,
    Running,
    Passed,
    Failed,
    /// A token we do not know about; treated as still in progress.
    Pending,
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Pending => "pending",
        };
        f.write_str(label)
    }
}

const BUILD_STATES: &[(&str, BuildState)] = &[
    ("success", BuildState::Passed),
    ("fixed", BuildState::Passed),
    ("failed", BuildState::Failed),
    ("timedout", BuildState::Failed),
    ("no_tests", BuildState::Failed),
    ("infrastructure_fail", BuildState::Failed),
    ("running", BuildState::Running),
    ("not_running", BuildState::Queued),
    ("scheduled", BuildState::Queued),
    ("queued", BuildState::Queued),
];

// Actions only ever fail these two ways; `no_tests` and friends are build-level.
const ACTION_STATES: &[(&str, BuildState)] = &[
    ("failed", BuildState::Failed),
    ("timedout", BuildState::Failed),
];

fn lookup(table: &[(&str, BuildState)], token: &str) -> BuildState {
    table
        .iter()
        .find(|(raw, _)| *raw == token)
        .map_or(BuildState::Pending, |(_, state)| *state)
}

/// Classifies the `status` of a build summary.
pub fn classify(token: &str) -> BuildState {
    lookup(BUILD_STATES, token)
}

/// Whether a single step action (one container's run of a step) failed.
pub fn action_failed(token: &str) -> bool {
    lookup(ACTION_STATES, token) == BuildState::Failed
}
