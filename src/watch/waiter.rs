use std::io::Write;
use std::time::Duration;

use log::{info, warn};

use crate::duration::format_duration;
use crate::error::{CircleError, Result};
use crate::output::{FetchProgress, StepTimings};
use crate::providers::{BuildDetail, CiProvider, PreviousBuild, TreeBuild};

use super::clock::Clock;
use super::cost::CostEstimator;
use super::failures::failure_texts;
use super::revision::{comparable_prefixes, revisions_match};
use super::schedule::{
    elapsed, next_poll_delay, REVISION_MISMATCH_DELAY, STARTUP_DELAY, TRANSIENT_RETRY_DELAY,
};
use super::status::BuildState;

/// The commit to wait for and where its builds live.
#[derive(Debug, Clone)]
pub struct WatchTarget {
    pub org: String,
    pub project: String,
    pub branch: String,
    pub revision: String,
}

/// How a watched build finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Passed {
        build_num: u32,
        elapsed: Duration,
    },
    Failed {
        build_num: u32,
        elapsed: Duration,
        build_url: String,
    },
}

/// Result of a single poll of the build list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Poll {
    /// Not finished; poll again after the delay.
    Wait(Duration),
    Done(Resolution),
}

/// Polls a CI provider until the build for a revision passes or fails.
///
/// Progress lines, the timing table and failure output go to `out`.
pub struct Waiter<'a, P: ?Sized, C: ?Sized, W> {
    provider: &'a P,
    clock: &'a C,
    out: W,
    cost: CostEstimator,
    interactive: bool,
}

impl<'a, P, C, W> Waiter<'a, P, C, W>
where
    P: CiProvider + ?Sized,
    C: Clock + ?Sized,
    W: Write,
{
    pub fn new(provider: &'a P, clock: &'a C, out: W) -> Self {
        Self {
            provider,
            clock,
            out,
            cost: CostEstimator::default(),
            interactive: false,
        }
    }

    #[must_use]
    pub fn with_cost(mut self, cost: CostEstimator) -> Self {
        self.cost = cost;
        self
    }

    /// Colourise failed steps and draw spinners.
    #[must_use]
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = interactive;
        self
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }

    /// Polls until the latest build for `target.revision` reaches a terminal state.
    ///
    /// # Errors
    ///
    /// Returns [`CircleError::NoBuilds`] if the branch has no builds, and any
    /// non-transient provider error as-is. A failed build is not an error.
    pub async fn wait(&mut self, target: &WatchTarget) -> Result<Resolution> {
        writeln!(
            self.out,
            "Waiting for latest build on {} to complete",
            target.branch
        )?;
        self.clock.sleep(STARTUP_DELAY).await;

        loop {
            match self.poll_once(target).await? {
                Poll::Wait(delay) => self.clock.sleep(delay).await,
                Poll::Done(resolution) => return Ok(resolution),
            }
        }
    }

    /// Fetches the build list once and decides what to do next.
    pub async fn poll_once(&mut self, target: &WatchTarget) -> Result<Poll> {
        let builds = match self
            .provider
            .list_builds(&target.org, &target.project, &target.branch)
            .await
        {
            Ok(builds) => builds,
            Err(e) if e.is_transient() => {
                warn!("Transient error listing builds: {e}");
                writeln!(self.out, "Caught network error: {e}. Continuing")?;
                return Ok(Poll::Wait(TRANSIENT_RETRY_DELAY));
            }
            Err(e) => return Err(e),
        };

        let Some(latest) = builds.first() else {
            return Err(CircleError::NoBuilds {
                org: target.org.clone(),
                project: target.project.clone(),
            });
        };

        if !revisions_match(&latest.vcs_revision, &target.revision) {
            let (remote, local) = comparable_prefixes(&latest.vcs_revision, &target.revision);
            writeln!(
                self.out,
                "Latest build in Circle is {remote}, waiting for {local}..."
            )?;
            return Ok(Poll::Wait(REVISION_MISMATCH_DELAY));
        }

        let elapsed = elapsed(latest, self.clock.now());
        let took = format_duration(elapsed);

        match latest.state() {
            BuildState::Passed => {
                info!("Build {} passed after {took}", latest.build_num);
                writeln!(self.out, "Build on {} succeeded!\n", target.branch)?;
                self.report_statistics(target, latest).await?;
                writeln!(
                    self.out,
                    "\nTests on {} took {took}. Quitting.",
                    target.branch
                )?;
                return Ok(Poll::Done(Resolution::Passed {
                    build_num: latest.build_num,
                    elapsed,
                }));
            }
            BuildState::Failed => {
                info!("Build {} failed after {took}", latest.build_num);
                if let Some(build) = self.report_statistics(target, latest).await? {
                    self.report_failures(target, &build).await?;
                }
                writeln!(self.out, "\nURL: {}", latest.build_url)?;
                return Ok(Poll::Done(Resolution::Failed {
                    build_num: latest.build_num,
                    elapsed,
                    build_url: latest.build_url.clone(),
                }));
            }
            BuildState::Running => writeln!(self.out, "Running ({took} elapsed)")?,
            BuildState::Queued => writeln!(
                self.out,
                "Status is {} (queued for {took}, cost {}), trying again",
                latest.status,
                self.cost.format_cost(elapsed)
            )?,
            BuildState::Pending => {
                writeln!(self.out, "Status is {}, trying again", latest.status)?;
            }
        }

        let reference = latest
            .previous
            .as_ref()
            .and_then(PreviousBuild::successful_duration);
        Ok(Poll::Wait(next_poll_delay(elapsed, reference)))
    }

    /// Prints the timing table for a finished build. A failure to fetch the
    /// build is reported and otherwise ignored.
    async fn report_statistics(
        &mut self,
        target: &WatchTarget,
        latest: &TreeBuild,
    ) -> Result<Option<BuildDetail>> {
        match self
            .provider
            .build_detail(&target.org, &target.project, latest.build_num)
            .await
        {
            Ok(build) => {
                let table = StepTimings::from_build(&build).render(self.interactive);
                write!(self.out, "{table}")?;
                Ok(Some(build))
            }
            Err(e) => {
                writeln!(self.out, "error getting build: {e}")?;
                Ok(None)
            }
        }
    }

    async fn report_failures(&mut self, target: &WatchTarget, build: &BuildDetail) -> Result<()> {
        let progress = FetchProgress::start(build.failures().len(), self.interactive);
        let texts = match failure_texts(self.provider, &target.org, &target.project, build).await
        {
            Ok(texts) => {
                progress.finish();
                texts
            }
            Err(e) => {
                progress.abandon();
                writeln!(self.out, "error getting build failures: {e}")?;
                Vec::new()
            }
        };

        write!(self.out, "\nOutput from failed builds:\n\n")?;
        for text in texts {
            writeln!(self.out, "{text}")?;
        }
        Ok(())
    }
}
