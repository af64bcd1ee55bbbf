use std::time::Duration;

use log::debug;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::auth::Token;
use crate::error::{CircleError, Result};

const REQUEST_TIMEOUT_SECONDS: u64 = 10;
pub const DEFAULT_BASE_URL: &str = "https://circleci.com/api/v1.1/project/";

/// Thin HTTP client for the CircleCI v1.1 project API.
pub struct CircleClient {
    client: Client,
    api_url: Url,
    vcs: String,
    token: Token,
}

impl CircleClient {
    pub fn new(base_url: &str, vcs: &str, token: Token) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .user_agent(concat!("circle-wait/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECONDS))
            .build()
            .map_err(|e| CircleError::Config(format!("Failed to create HTTP client: {e}")))?;

        let api_url = Url::parse(base_url)
            .map_err(|e| CircleError::Config(format!("Invalid base URL: {e}")))?;
        if api_url.cannot_be_a_base() {
            return Err(CircleError::Config(format!(
                "Invalid base URL: {base_url} cannot be a base"
            )));
        }

        Ok(Self {
            client,
            api_url,
            vcs: vcs.to_owned(),
            token,
        })
    }

    /// Construct the URL for a project resource, e.g. `github/org/project/tree/main`.
    pub fn project_url(&self, org: &str, project: &str, tail: &[&str]) -> Url {
        let mut url = self.api_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend([self.vcs.as_str(), org, project])
                .extend(tail);
        }
        url.query_pairs_mut()
            .append_pair("circle-token", self.token.as_str());
        url
    }

    /// GET a project resource and decode its JSON body.
    pub async fn get_json<T>(&self, org: &str, project: &str, tail: &[&str]) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.project_url(org, project, tail);
        debug!("GET {}/{}/{}", org, project, tail.join("/"));

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(CircleError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}
