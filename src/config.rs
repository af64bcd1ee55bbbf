use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::providers::DEFAULT_BASE_URL;
use crate::watch::cost::CostEstimator;

/// Configuration file structure for circle-wait.
///
/// Everything has a default, so the file is optional. Loaded from the current
/// directory or a path given on the command line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// CircleCI API settings
    #[serde(default)]
    pub circle: CircleConfig,

    /// Salary assumptions behind the queued-time cost estimate
    #[serde(default)]
    pub cost: CostEstimator,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CircleConfig {
    /// API token; overrides the organizations token file
    pub token: Option<String>,

    /// CircleCI v1.1 project API base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Version control host as CircleCI names it
    #[serde(default = "default_vcs")]
    pub vcs: String,

    /// Git remote identifying the project
    #[serde(default = "default_remote")]
    pub remote: String,
}

impl Default for CircleConfig {
    fn default() -> Self {
        Self {
            token: None,
            base_url: default_base_url(),
            vcs: default_vcs(),
            remote: default_remote(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_vcs() -> String {
    "github".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path
    /// 2. ./circle-wait.toml
    /// 3. ./circle-wait.json
    /// 4. ./circle-wait.yaml
    /// 5. ./circle-wait.yml
    ///
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        let candidates = [
            "circle-wait.toml",
            "circle-wait.json",
            "circle-wait.yaml",
            "circle-wait.yml",
        ];

        for candidate in &candidates {
            let path = Path::new(candidate);
            if path.exists() {
                return Self::load_from_path(path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file path.
    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            _ => toml::from_str(&contents)
                .or_else(|_| serde_json::from_str(&contents))
                .or_else(|_| serde_yaml::from_str(&contents))
                .with_context(|| format!("Failed to parse config file: {}", path.display())),
        }
    }
}
