use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{CircleError, Result};

/// A CircleCI API token. Never printed in full.
#[derive(Clone)]
pub struct Token(String);

impl Token {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Token(***)")
    }
}

/// Token file contents:
///
/// ```toml
/// [organizations]
///
///     [organizations.Shyp]
///     token = "aabbccddeeff00"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct TokenFile {
    #[serde(default)]
    pub organizations: HashMap<String, Organization>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Organization {
    pub token: String,
}

impl TokenFile {
    /// Case-insensitive lookup of an organization's token.
    pub fn token_for(&self, org: &str) -> Result<Token> {
        self.organizations
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(org))
            .map(|(_, o)| Token::from(o.token.as_str()))
            .ok_or_else(|| {
                CircleError::Config(format!(
                    "Couldn't find organization {org} in the config.\n\n\
                     Go to https://circleci.com/account/api if you need to create a token."
                ))
            })
    }

    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| {
            CircleError::Config(format!("Failed to parse {}: {e}", path.display()))
        })
    }
}

/// Candidate token file locations, in lookup order.
fn candidate_paths(xdg_config_home: Option<PathBuf>, home: Option<PathBuf>) -> Vec<PathBuf> {
    if let Some(cfg) = xdg_config_home {
        return vec![cfg.join("circleci")];
    }
    let home = home.unwrap_or_default();
    vec![home.join("cfg").join("circleci"), home.join(".circlerc")]
}

/// Finds the token for `org` in the first readable token file.
///
/// # Errors
///
/// Returns a configuration error if no token file exists, it does not parse,
/// or it has no entry for the organization.
pub fn find_token(org: &str) -> Result<Token> {
    let candidates = candidate_paths(
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        dirs::home_dir(),
    );
    find_token_in(org, &candidates)
}

fn find_token_in(org: &str, candidates: &[PathBuf]) -> Result<Token> {
    let Some(path) = candidates.iter().find(|path| path.is_file()) else {
        let checked = candidates
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(" or ");
        return Err(CircleError::Config(format!(
            "Couldn't find a config file in {checked}.\n\n\
             Add a configuration file with your CircleCI token, like this:\n\n\
             [organizations]\n\n    [organizations.{org}]\n    token = \"aabbccddeeff00\"\n\n\
             Go to https://circleci.com/account/api if you need to create a token."
        )));
    };
    TokenFile::load_from_path(path)?.token_for(org)
}
