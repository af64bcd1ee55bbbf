mod client;
mod provider;
mod types;

pub use client::DEFAULT_BASE_URL;
pub use provider::CircleProvider;
pub use types::{BuildDetail, OutputChunk, PreviousBuild, TreeBuild};

#[cfg(test)]
pub use types::{Action, Step};
