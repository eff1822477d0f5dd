//! Client configuration and well-known locations.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::{ClientError, ClientResult};

/// Default API root when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
/// Header carrying the per-invocation request identifier.
pub const HEADER_REQUEST_ID: &str = "x-request-id";
/// Environment variable overriding the docfolder home directory.
pub const HOME_ENV: &str = "DOCFOLDER_HOME";
/// Session file name inside the docfolder home directory.
pub const SESSION_FILE_NAME: &str = "session.json";

/// Settings used to build an [`ApiClient`](crate::ApiClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    base_url: Url,
    /// Whole-request timeout; `None` waits for the server indefinitely.
    pub timeout: Option<Duration>,
    /// Value sent as `x-request-id` on every request.
    pub request_id: Option<String>,
}

impl ClientConfig {
    /// Configuration rooted at `base_url` (for example `http://host:8080/api`).
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url: with_trailing_slash(base_url),
            timeout: None,
            request_id: None,
        }
    }

    /// Set a whole-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Attach a request identifier to every request.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// API root, always ending in `/`.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an API path such as `/protected/documents` against the root.
    ///
    /// # Errors
    ///
    /// Returns an error if the combined URL is invalid.
    pub fn endpoint(&self, path: &str) -> ClientResult<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|source| ClientError::InvalidUrl {
                path: path.to_string(),
                source,
            })
    }
}

/// Parse an API root supplied on the command line or in the environment.
///
/// # Errors
///
/// Returns a message describing why the input is not a usable URL.
pub fn parse_api_url(input: &str) -> Result<Url, String> {
    let url = input
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))?;
    if url.cannot_be_a_base() {
        return Err(format!("invalid URL '{input}': cannot be used as a base"));
    }
    Ok(url)
}

/// Directory holding docfolder state: `$DOCFOLDER_HOME`, else `~/.docfolder`.
#[must_use]
pub fn docfolder_home() -> Option<PathBuf> {
    if let Some(home) = env::var_os(HOME_ENV).filter(|value| !value.is_empty()) {
        return Some(PathBuf::from(home));
    }
    dirs::home_dir().map(|home| home.join(".docfolder"))
}

/// Default location of the persisted session.
#[must_use]
pub fn default_session_path() -> Option<PathBuf> {
    docfolder_home().map(|home| home.join(SESSION_FILE_NAME))
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base: &str) -> anyhow::Result<ClientConfig> {
        Ok(ClientConfig::new(
            parse_api_url(base).map_err(anyhow::Error::msg)?,
        ))
    }

    #[test]
    fn endpoint_keeps_api_prefix() -> anyhow::Result<()> {
        let config = config("http://localhost:8080/api")?;
        assert_eq!(config.base_url().as_str(), "http://localhost:8080/api/");
        assert_eq!(
            config.endpoint("/protected/documents/7")?.as_str(),
            "http://localhost:8080/api/protected/documents/7"
        );
        assert_eq!(
            config.endpoint("login")?.as_str(),
            "http://localhost:8080/api/login"
        );
        Ok(())
    }

    #[test]
    fn endpoint_works_with_root_base() -> anyhow::Result<()> {
        let config = config("http://127.0.0.1:9000")?;
        assert_eq!(
            config.endpoint("/register")?.as_str(),
            "http://127.0.0.1:9000/register"
        );
        Ok(())
    }

    #[test]
    fn parse_api_url_rejects_invalid_input() {
        let err = parse_api_url("not-a-url").expect_err("invalid URL should fail");
        assert!(err.contains("invalid URL"));
        assert!(parse_api_url("mailto:someone@example.com").is_err());
    }

    #[test]
    fn default_api_url_targets_local_api() -> anyhow::Result<()> {
        let config = config(DEFAULT_API_URL)?;
        assert_eq!(config.base_url().as_str(), "http://localhost:8080/api/");
        assert!(config.timeout.is_none());
        assert!(config.request_id.is_none());
        Ok(())
    }

    #[test]
    fn builders_set_optional_fields() -> anyhow::Result<()> {
        let config = config(DEFAULT_API_URL)?
            .with_timeout(Duration::from_secs(5))
            .with_request_id("trace-1");
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
        assert_eq!(config.request_id.as_deref(), Some("trace-1"));
        Ok(())
    }

    #[test]
    fn default_session_path_uses_session_file_name() {
        if let Some(path) = default_session_path() {
            assert!(path.ends_with(SESSION_FILE_NAME));
        }
    }
}
