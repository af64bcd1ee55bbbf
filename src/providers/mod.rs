mod circle;

use async_trait::async_trait;

use crate::error::Result;

pub use circle::{
    BuildDetail, CircleProvider, OutputChunk, PreviousBuild, TreeBuild, DEFAULT_BASE_URL,
};

#[cfg(test)]
pub use circle::{Action, Step};

/// Read access to a CI provider's build data.
///
/// Implementations hold no per-call state and may be invoked concurrently.
#[async_trait]
pub trait CiProvider: Send + Sync {
    /// Builds for a branch, most recent first.
    async fn list_builds(&self, org: &str, project: &str, branch: &str) -> Result<Vec<TreeBuild>>;

    async fn build_detail(&self, org: &str, project: &str, build_num: u32) -> Result<BuildDetail>;

    /// Output of one container's run of one step.
    async fn failure_output(
        &self,
        org: &str,
        project: &str,
        build_num: u32,
        step: usize,
        container: usize,
    ) -> Result<Vec<OutputChunk>>;
}
