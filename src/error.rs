//! Error types and exit-code mapping.

use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

use crate::api::types::RemoteError;

/// Errors raised by the API client.
#[derive(Error, Debug)]
pub enum XApiError {
    /// The service answered with a non-success status.
    #[error("API request failed: {}{}", describe_status(.status), describe_remote(.detail.as_deref(), .errors))]
    Request {
        status: u16,
        /// Structured errors from the body; empty when the body was not JSON
        errors: Vec<RemoteError>,
        /// Problem-details `detail` or `title`, when the body carried one
        detail: Option<String>,
    },

    /// The request never produced a response (DNS, refused connection, timeout).
    #[error("could not reach the X API: {0}")]
    Transport(#[source] reqwest::Error),

    /// A success response whose body is not the expected JSON shape.
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

impl XApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for XApiError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e)
    }
}

fn describe_status(status: &u16) -> String {
    match StatusCode::from_u16(*status)
        .ok()
        .and_then(|s| s.canonical_reason())
    {
        Some(reason) => format!("{status} {reason}"),
        None => status.to_string(),
    }
}

fn describe_remote(detail: Option<&str>, errors: &[RemoteError]) -> String {
    let messages: Vec<&str> = errors.iter().filter_map(RemoteError::summary).collect();
    if !messages.is_empty() {
        format!(" ({})", messages.join("; "))
    } else if let Some(detail) = detail {
        format!(" ({detail})")
    } else {
        String::new()
    }
}

/// Result type for API client operations.
pub type XApiResult<T> = Result<T, XApiError>;

/// Errors raised while resolving or writing local configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "X API token not found. Please set your token in one of the following ways:\n  \
         1. Create {} with: {{\"token\": \"your_token_here\"}}\n  \
         2. Put your token in {}\n  \
         3. Run: x-cli config --token <token>",
        .config_file.display(),
        .legacy_token_file.display()
    )]
    MissingCredential {
        config_file: PathBuf,
        legacy_token_file: PathBuf,
    },

    #[error("could not determine the home directory")]
    NoHomeDir,

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Standard exit codes (BSD sysexits.h compatible).
pub mod exitcode {
    /// Unclassified failure
    pub const FAILURE: i32 = 1;

    /// Response body could not be decoded
    pub const DATAERR: i32 = 65;

    /// Remote service failed or could not be reached
    pub const UNAVAILABLE: i32 = 69;

    /// Local input/output error
    pub const IOERR: i32 = 74;

    /// Missing or invalid configuration
    pub const CONFIG: i32 = 78;
}

/// Exit code for an error surfaced at the top-level boundary.
pub fn exit_code(err: &anyhow::Error) -> i32 {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<ConfigError>() {
            return match e {
                ConfigError::Io { .. } => exitcode::IOERR,
                _ => exitcode::CONFIG,
            };
        }
        if let Some(e) = cause.downcast_ref::<XApiError>() {
            return match e {
                XApiError::Decode(_) => exitcode::DATAERR,
                _ => exitcode::UNAVAILABLE,
            };
        }
        if cause.downcast_ref::<std::io::Error>().is_some() {
            return exitcode::IOERR;
        }
    }
    exitcode::FAILURE
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_request_error_display_uses_remote_messages() {
        let err = XApiError::Request {
            status: 400,
            errors: vec![RemoteError {
                message: Some("Invalid query".into()),
                ..Default::default()
            }],
            detail: None,
        };
        assert_eq!(
            err.to_string(),
            "API request failed: 400 Bad Request (Invalid query)"
        );
    }

    #[test]
    fn test_request_error_display_falls_back_to_detail() {
        let err = XApiError::Request {
            status: 401,
            errors: Vec::new(),
            detail: Some("Unauthorized".into()),
        };
        assert_eq!(err.to_string(), "API request failed: 401 Unauthorized (Unauthorized)");
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn test_missing_credential_names_both_paths() {
        let err = ConfigError::MissingCredential {
            config_file: PathBuf::from("/home/u/.x-cli.json"),
            legacy_token_file: PathBuf::from("/home/u/my/x-token.txt"),
        };
        let msg = err.to_string();
        assert!(msg.contains("/home/u/.x-cli.json"));
        assert!(msg.contains("/home/u/my/x-token.txt"));
    }

    #[test]
    fn test_exit_code_walks_context_chain() {
        let err = Err::<(), _>(ConfigError::NoHomeDir)
            .context("loading configuration")
            .unwrap_err();
        assert_eq!(exit_code(&err), exitcode::CONFIG);

        let err = anyhow::Error::new(XApiError::Request {
            status: 503,
            errors: Vec::new(),
            detail: None,
        });
        assert_eq!(exit_code(&err), exitcode::UNAVAILABLE);

        assert_eq!(exit_code(&anyhow::anyhow!("boom")), exitcode::FAILURE);
    }
}
