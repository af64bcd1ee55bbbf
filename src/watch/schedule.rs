//! Sleep intervals for the watch loop.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::duration::round_duration;
use crate::providers::TreeBuild;

/// Delay before re-polling when the latest build is for another revision.
pub const REVISION_MISMATCH_DELAY: Duration = Duration::from_secs(5);
/// Delay before retrying a request that failed with a transient network error.
pub const TRANSIENT_RETRY_DELAY: Duration = Duration::from_secs(2);
/// Delay before the first poll, so the provider can pick up the push.
pub const STARTUP_DELAY: Duration = Duration::from_secs(1);

const MINUTE: Duration = Duration::from_secs(60);

/// Time the build has spent queued and running, rounded to the second.
///
/// Measured from `queued_at`, else `usage_queued_at`, up to `stop_time` or
/// `now`. Builds with neither anchor report zero.
pub fn elapsed(build: &TreeBuild, now: DateTime<Utc>) -> Duration {
    let Some(start) = build.queued_at.or(build.usage_queued_at) else {
        return Duration::ZERO;
    };
    let end = build.stop_time.unwrap_or(now);
    let elapsed = (end - start).to_std().unwrap_or(Duration::ZERO);
    round_duration(elapsed, Duration::from_secs(1))
}

/// How long to wait before polling a build that is not finished yet.
///
/// With the duration of the previous successful build as a reference, polls
/// get more frequent as the build nears that duration. Without one, a flat
/// 10s for the first two and a half minutes then 5s.
pub fn next_poll_delay(elapsed: Duration, previous_success: Option<Duration>) -> Duration {
    let Some(reference) = previous_success else {
        return if elapsed < MINUTE * 5 / 2 {
            Duration::from_secs(10)
        } else {
            Duration::from_secs(5)
        };
    };

    // Early failures are more likely.
    if elapsed < MINUTE {
        return Duration::from_secs(5);
    }

    let remaining = reference.saturating_sub(elapsed);
    let secs = if remaining > MINUTE * 5 {
        30
    } else if remaining > MINUTE * 3 {
        20
    } else if remaining > MINUTE {
        15
    } else if remaining > Duration::from_secs(30) {
        10
    } else if remaining > Duration::from_secs(10) {
        5
    } else {
        3
    };
    Duration::from_secs(secs)
}
