use async_trait::async_trait;
use log::debug;

use crate::auth::Token;
use crate::error::Result;
use crate::providers::CiProvider;

use super::client::CircleClient;
use super::types::{BuildDetail, OutputChunk, TreeBuild};

/// CircleCI build provider.
///
/// Reads branch build lists, build details and step output from the v1.1
/// project API.
pub struct CircleProvider {
    client: CircleClient,
}

impl CircleProvider {
    /// Creates a provider talking to `base_url` for repositories hosted on `vcs`
    /// (`github` or `bitbucket`).
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client cannot
    /// be built.
    pub fn new(base_url: &str, vcs: &str, token: Token) -> Result<Self> {
        Ok(Self {
            client: CircleClient::new(base_url, vcs, token)?,
        })
    }
}

#[async_trait]
impl CiProvider for CircleProvider {
    async fn list_builds(&self, org: &str, project: &str, branch: &str) -> Result<Vec<TreeBuild>> {
        let builds: Vec<TreeBuild> = self
            .client
            .get_json(org, project, &["tree", branch])
            .await?;
        debug!("Fetched {} builds for {org}/{project}@{branch}", builds.len());
        Ok(builds)
    }

    async fn build_detail(&self, org: &str, project: &str, build_num: u32) -> Result<BuildDetail> {
        self.client
            .get_json(org, project, &[&build_num.to_string()])
            .await
    }

    async fn failure_output(
        &self,
        org: &str,
        project: &str,
        build_num: u32,
        step: usize,
        container: usize,
    ) -> Result<Vec<OutputChunk>> {
        let build_num = build_num.to_string();
        let step = step.to_string();
        let container = container.to_string();
        self.client
            .get_json(org, project, &[&build_num, "output", &step, &container])
            .await
    }
}
