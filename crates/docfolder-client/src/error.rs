//! Error types for client and token-store operations.

use std::io;
use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Result alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;

/// Failures raised while persisting or loading the session token.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The session file exists but could not be read.
    #[error("failed to read session file {}", path.display())]
    Read {
        /// Session file location.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The session file or its parent directory could not be written.
    #[error("failed to write session file {}", path.display())]
    Write {
        /// Session file location.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The session file could not be removed.
    #[error("failed to remove session file {}", path.display())]
    Remove {
        /// Session file location.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The session file did not contain a valid session document.
    #[error("session file {} is not valid JSON", path.display())]
    Parse {
        /// Session file location.
        path: PathBuf,
        /// Underlying serde error.
        source: serde_json::Error,
    },
    /// The session document could not be serialised.
    #[error("failed to serialize session")]
    Serialize {
        /// Underlying serde error.
        source: serde_json::Error,
    },
}

/// Primary error type for API calls.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never produced a response (connection refused, DNS, timeout).
    #[error("request to {path} failed")]
    Transport {
        /// API path that was requested.
        path: String,
        /// Underlying transport error.
        source: reqwest::Error,
    },
    /// The server rejected the bearer token; the session has been cleared.
    #[error("Unauthorized")]
    Unauthorized,
    /// The server answered with a non-success status.
    #[error("{message}")]
    Api {
        /// HTTP status returned by the server.
        status: StatusCode,
        /// Server-supplied `error` text, or a status-based fallback.
        message: String,
    },
    /// A success response carried a body that could not be decoded.
    #[error("failed to decode response from {path}")]
    Decode {
        /// API path that was requested.
        path: String,
        /// Underlying decode error.
        source: reqwest::Error,
    },
    /// `/login` answered with success but carried an empty access token.
    #[error("response from {path} did not include an access token")]
    EmptyToken {
        /// API path that was requested.
        path: String,
    },
    /// The configured base URL could not be combined with an API path.
    #[error("invalid request URL for {path}")]
    InvalidUrl {
        /// API path that was requested.
        path: String,
        /// Underlying URL parse error.
        source: url::ParseError,
    },
    /// A configured header value contained characters HTTP does not allow.
    #[error("invalid value for header {name}")]
    InvalidHeader {
        /// Header name.
        name: &'static str,
    },
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client")]
    Build {
        /// Underlying reqwest builder error.
        source: reqwest::Error,
    },
    /// Persisting or clearing the session token failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ClientError {
    /// HTTP status associated with the failure, when the server answered.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Unauthorized => Some(StatusCode::UNAUTHORIZED),
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` when the failure is an expired or missing session.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn api_error_displays_server_message() {
        let err = ClientError::Api {
            status: StatusCode::BAD_REQUEST,
            message: "Title and positive sheets_count are required".into(),
        };
        assert_eq!(
            err.to_string(),
            "Title and positive sheets_count are required"
        );
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn unauthorized_reports_401() {
        let err = ClientError::Unauthorized;
        assert_eq!(err.to_string(), "Unauthorized");
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
        assert!(err.is_unauthorized());
    }

    #[test]
    fn store_errors_keep_their_source() {
        let err = StoreError::Write {
            path: PathBuf::from("/tmp/session.json"),
            source: io::Error::other("disk full"),
        };
        assert_eq!(
            err.to_string(),
            "failed to write session file /tmp/session.json"
        );
        assert!(err.source().is_some());

        let wrapped = ClientError::from(err);
        assert!(wrapped.to_string().starts_with("failed to write session file"));
        assert_eq!(wrapped.status(), None);
    }
}
