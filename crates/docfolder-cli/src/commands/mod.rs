//! Command handlers grouped by concern.

pub(crate) mod auth;
pub(crate) mod documents;
pub(crate) mod folders;

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use anyhow::Result;
    use docfolder_client::{ClientConfig, FileTokenStore, NoopNotifier, TokenStore};
    use docfolder_test_support::fixtures::temp_path;
    use httpmock::MockServer;

    use crate::client::AppContext;

    /// Context pointed at `server` with a fresh, empty session file.
    pub(crate) fn context_with(server: &MockServer) -> Result<AppContext> {
        let config = ClientConfig::new(server.url("/api").parse()?);
        Ok(AppContext::open(
            config,
            temp_path("session.json"),
            Arc::new(NoopNotifier),
        )?)
    }

    /// Context whose session file already holds `token`.
    pub(crate) fn context_with_token(server: &MockServer, token: &str) -> Result<AppContext> {
        let path = temp_path("session.json");
        FileTokenStore::new(&path).save(token)?;
        let config = ClientConfig::new(server.url("/api").parse()?);
        Ok(AppContext::open(config, path, Arc::new(NoopNotifier))?)
    }
}
