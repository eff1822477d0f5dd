#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Authenticated client for the docfolder document API.
//!
//! Layout:
//! - `client.rs`: [`ApiClient`], the bearer-token request wrapper and feature operations
//! - `session.rs`: [`Session`] and [`AuthState`], the explicit token holder
//! - `store.rs`: [`TokenStore`] backends (file, memory)
//! - `notify.rs`: [`StatusNotifier`] callbacks for session transitions
//! - `config.rs`: [`ClientConfig`] and default locations
//! - `error.rs`: [`ClientError`] and [`StoreError`]

pub mod client;
pub mod config;
pub mod error;
pub mod notify;
pub mod session;
pub mod store;

pub use client::ApiClient;
pub use config::{ClientConfig, DEFAULT_API_URL, default_session_path, parse_api_url};
pub use error::{ClientError, ClientResult, StoreError};
pub use notify::{AuthEvent, NoopNotifier, StatusNotifier, TracingNotifier};
pub use session::{AuthState, Session};
pub use store::{FileTokenStore, MemoryTokenStore, StoredSession, TokenStore};
