use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use console::Term;
use log::info;
use std::path::PathBuf;

use crate::auth::{self, Token};
use crate::browser;
use crate::config::Config;
use crate::duration::format_duration;
use crate::error::CircleError;
use crate::git;
use crate::output::render_recent_builds;
use crate::providers::{CiProvider, CircleProvider, TreeBuild};
use crate::watch::{Resolution, SystemClock, Waiter, WatchTarget};

#[derive(Parser)]
#[command(name = "circle-wait")]
#[command(author, version, about = "Wait for CircleCI builds", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ./circle-wait.{toml,json,yaml,yml})
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// CircleCI API token; falls back to the organizations token file
    #[arg(short, long, global = true, env = "CIRCLE_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Wait for the build of a branch's tip to finish, then print step
    /// timings and, on failure, the output of the failed steps.
    Wait {
        /// Branch to wait for (defaults to the current branch)
        branch: Option<String>,
    },
    /// Show the most recent builds of a branch
    Builds {
        /// Branch to list (defaults to the current branch)
        branch: Option<String>,
    },
    /// Open the latest build of a branch in a browser
    Open {
        /// Branch whose build to open (defaults to the current branch)
        branch: Option<String>,
    },
}

/// Maps a resolution to the command's result; failed builds exit non-zero.
fn ensure_passed(resolution: &Resolution, branch: &str) -> Result<()> {
    match resolution {
        Resolution::Passed { .. } => Ok(()),
        Resolution::Failed { .. } => bail!("Build on {branch} failed!"),
    }
}

fn latest_build_url<'a>(builds: &'a [TreeBuild], org: &str, project: &str) -> Result<&'a str> {
    match builds.first() {
        Some(latest) => Ok(latest.build_url.as_str()),
        None => Err(CircleError::NoBuilds {
            org: org.to_owned(),
            project: project.to_owned(),
        }
        .into()),
    }
}

fn branch_or_current(branch: Option<&str>) -> Result<String> {
    match branch {
        Some(branch) => Ok(branch.to_owned()),
        None => git::current_branch().context("Failed to determine the current branch"),
    }
}

impl Cli {
    fn provider(&self, config: &Config, org: &str) -> Result<CircleProvider> {
        let token = match self.token.as_deref().or(config.circle.token.as_deref()) {
            Some(token) => Token::from(token),
            None => auth::find_token(org)?,
        };
        Ok(CircleProvider::new(
            &config.circle.base_url,
            &config.circle.vcs,
            token,
        )?)
    }

    async fn execute_wait(&self, config: &Config, branch: Option<&str>) -> Result<()> {
        let branch = branch_or_current(branch)?;
        let remote = git::remote_project(&config.circle.remote)?;
        let revision = git::tip(&branch).with_context(|| format!("Unknown branch {branch}"))?;
        info!(
            "Waiting on {}/{}@{branch} ({revision})",
            remote.org, remote.project
        );

        let provider = self.provider(config, &remote.org)?;
        let target = WatchTarget {
            org: remote.org,
            project: remote.project,
            branch,
            revision,
        };

        let clock = SystemClock;
        let mut waiter = Waiter::new(&provider, &clock, std::io::stdout())
            .with_cost(config.cost.clone())
            .interactive(Term::stdout().is_term());
        let resolution = waiter.wait(&target).await?;

        let (Resolution::Passed { elapsed, .. } | Resolution::Failed { elapsed, .. }) = &resolution;
        info!("Build resolved after {}", format_duration(*elapsed));
        ensure_passed(&resolution, &target.branch)
    }

    async fn execute_builds(&self, config: &Config, branch: Option<&str>) -> Result<()> {
        let branch = branch_or_current(branch)?;
        // Fails early if the branch does not exist locally.
        git::tip(&branch).with_context(|| format!("Unknown branch {branch}"))?;
        let remote = git::remote_project(&config.circle.remote)?;

        println!("\nFetching recent builds for {branch} starting with most recent commit\n");

        let provider = self.provider(config, &remote.org)?;
        let builds = provider
            .list_builds(&remote.org, &remote.project, &branch)
            .await
            .context("Failed to fetch builds")?;

        println!("{}", render_recent_builds(&builds));
        println!("\nMost recent build statuses fetched!");

        Ok(())
    }

    async fn execute_open(&self, config: &Config, branch: Option<&str>) -> Result<()> {
        let branch = branch_or_current(branch)?;
        let remote = git::remote_project(&config.circle.remote)?;

        let provider = self.provider(config, &remote.org)?;
        let builds = provider
            .list_builds(&remote.org, &remote.project, &branch)
            .await
            .context("Failed to fetch builds")?;

        let url = latest_build_url(&builds, &remote.org, &remote.project)?;
        info!("Opening {url}");
        browser::open(url).with_context(|| format!("Failed to open {url}"))
    }

    pub async fn execute(&self) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;

        match &self.command {
            Commands::Wait { branch } => self.execute_wait(&config, branch.as_deref()).await,
            Commands::Builds { branch } => self.execute_builds(&config, branch.as_deref()).await,
            Commands::Open { branch } => self.execute_open(&config, branch.as_deref()).await,
        }
    }
}
