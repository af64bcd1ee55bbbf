use std::io::ErrorKind;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CircleError {
    #[error("API request failed with status {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("git: {0}")]
    Git(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No results, are you sure there are tests for {org}/{project}?")]
    NoBuilds { org: String, project: String },
}

impl CircleError {
    /// Whether the error is a dial failure, a DNS failure or a timeout, all of
    /// which are worth retrying with the exact same request. reqwest reports
    /// failed lookups as connect errors.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(e) => e.is_connect() || e.is_timeout(),
            Self::Io(e) => matches!(
                e.kind(),
                ErrorKind::ConnectionRefused
                    | ErrorKind::TimedOut
                    | ErrorKind::Interrupted
                    | ErrorKind::WouldBlock
            ),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, CircleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_refused_is_transient() {
        let err = CircleError::Io(std::io::Error::new(
            ErrorKind::ConnectionRefused,
            "dial tcp 127.0.0.1:11233: connect: connection refused",
        ));
        assert!(err.is_transient());
    }

    #[test]
    fn test_timeout_is_transient() {
        let err = CircleError::Io(std::io::Error::new(ErrorKind::TimedOut, "deadline exceeded"));
        assert!(err.is_transient());
    }

    #[test]
    fn test_api_and_config_errors_are_terminal() {
        let api = CircleError::Api {
            status: 401,
            message: "Unauthorized".to_string(),
        };
        assert!(!api.is_transient());
        assert!(!CircleError::Config("missing token".to_string()).is_transient());
        assert!(!CircleError::Io(std::io::Error::new(ErrorKind::NotFound, "gone")).is_transient());
    }

    #[test]
    fn test_no_builds_message_names_project() {
        let err = CircleError::NoBuilds {
            org: "Shyp".to_string(),
            project: "go-circle".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No results, are you sure there are tests for Shyp/go-circle?"
        );
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn test_refused_connection_from_reqwest_is_transient() {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(200))
            .build()
            .unwrap();
        let err = client
            .get("http://127.0.0.1:11233")
            .send()
            .await
            .unwrap_err();
        assert!(CircleError::from(err).is_transient());
    }

    #[tokio::test]
    async fn test_unresolvable_host_from_reqwest_is_transient() {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(5))
            .build()
            .unwrap();
        let err = client
            .get("http://no-such-host.invalid/")
            .send()
            .await
            .unwrap_err();
        assert!(err.is_connect());
        assert!(CircleError::from(err).is_transient());
    }
}
