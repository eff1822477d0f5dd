//! Shared CLI plumbing: errors, exit codes, and the per-invocation context.

use std::fmt::{self, Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use docfolder_client::{
    ApiClient, AuthEvent, ClientConfig, ClientError, FileTokenStore, Session, StatusNotifier,
    StoreError, TokenStore, TracingNotifier,
};
use reqwest::StatusCode;

use crate::output::status_line;

/// CLI-level error type to distinguish bad input, rejected sessions, and
/// operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Unauthorized,
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
            Self::Unauthorized => 4,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Unauthorized => {
                "Unauthorized: session expired or missing; run `docfolder login`".to_string()
            }
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<ClientError> for CliError {
    fn from(err: ClientError) -> Self {
        let validation = err.status().is_some_and(is_validation_status);
        match err {
            ClientError::Unauthorized => Self::Unauthorized,
            ClientError::Api { message, .. } if validation => Self::Validation(message),
            other => Self::failure(other),
        }
    }
}

const fn is_validation_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY
    )
}

/// Prints session transitions to stderr and mirrors them to the log.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ConsoleNotifier;

impl StatusNotifier for ConsoleNotifier {
    fn notify(&self, event: AuthEvent) {
        TracingNotifier.notify(event);
        eprintln!("{}", status_line(event));
    }
}

/// Application context passed to command handlers.
pub(crate) struct AppContext {
    pub(crate) api: ApiClient,
    pub(crate) session_file: PathBuf,
}

impl AppContext {
    /// Restore the session persisted at `session_file` and bind a client to it.
    pub(crate) fn open(
        config: ClientConfig,
        session_file: PathBuf,
        notifier: Arc<dyn StatusNotifier>,
    ) -> CliResult<Self> {
        let session = Arc::new(open_session(&session_file, notifier)?);
        let api = ApiClient::new(config, session)?;
        tracing::debug!(
            api_url = %api.config().base_url(),
            session_file = %session_file.display(),
            "client ready"
        );
        Ok(Self { api, session_file })
    }
}

fn open_session(path: &Path, notifier: Arc<dyn StatusNotifier>) -> CliResult<Session> {
    let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(path));
    match Session::open(Arc::clone(&store), Arc::clone(&notifier)) {
        Ok(session) => Ok(session),
        Err(StoreError::Parse { path, .. }) => {
            tracing::warn!(path = %path.display(), "discarding unreadable session file");
            store.clear().map_err(CliError::failure)?;
            Session::open(store, notifier).map_err(CliError::failure)
        }
        Err(err) => Err(CliError::failure(err)),
    }
}
