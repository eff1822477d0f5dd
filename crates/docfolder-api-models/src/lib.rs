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
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
//! Shared HTTP DTOs for the docfolder document API.
//!
//! Request payloads are strongly typed so the client and CLI agree on the
//! wire contract. Document and folder responses are owned by the backend and
//! are passed around as opaque JSON values.
use std::fmt::{self, Debug, Formatter};

use serde::{Deserialize, Serialize};

/// Query parameter carrying the document type for folder recommendations.
pub const QUERY_DOCUMENT_TYPE_ID: &str = "document_type_id";
/// Query parameter carrying the sheet count for folder recommendations.
pub const QUERY_SHEETS_COUNT: &str = "sheets_count";

/// Email/password pair submitted to `/register` and `/login`.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credentials {
    /// Account email address.
    pub email: String,
    /// Plain-text password; only ever sent over the wire.
    pub password: String,
}

impl Credentials {
    /// Build a credential pair.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl Debug for Credentials {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful `/login` response.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenResponse {
    /// Bearer token used for `/protected` routes.
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Refresh token issued alongside the access token, when the server provides one.
    pub refresh_token: Option<String>,
}

impl Debug for TokenResponse {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("TokenResponse")
            .field("access_token", &"<redacted>")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

/// Successful `/register` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Human-readable confirmation from the server.
    pub message: Option<String>,
}

/// Error document returned by the API on every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    /// Server-supplied failure description.
    pub error: String,
}

/// Payload for `POST /protected/documents`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentCreateRequest {
    /// Document title.
    pub title: String,
    /// Number of sheets the document occupies.
    pub sheets_count: i64,
    /// Document type identifier.
    pub document_type_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Target folder; the server files the document unassigned when absent.
    pub folder_id: Option<u64>,
}

/// Payload for `PUT /protected/documents/{id}`; unset fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentUpdateRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Replacement title.
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Replacement sheet count.
    pub sheets_count: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Replacement folder assignment.
    pub folder_id: Option<u64>,
}

impl DocumentUpdateRequest {
    /// Returns `true` when no field would be changed by this update.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.sheets_count.is_none() && self.folder_id.is_none()
    }
}

/// Query for `GET /protected/folders/recommended`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecommendationQuery {
    /// Document type the folder must accept.
    pub document_type_id: u64,
    #[serde(default)]
    /// Sheets that must fit in the folder; `0` when the caller has no estimate.
    pub sheets_count: i64,
}

impl RecommendationQuery {
    /// Render the query as ordered `(name, value)` pairs.
    #[must_use]
    pub fn query_pairs(&self) -> [(&'static str, String); 2] {
        [
            (QUERY_DOCUMENT_TYPE_ID, self.document_type_id.to_string()),
            (QUERY_SHEETS_COUNT, self.sheets_count.to_string()),
        ]
    }
}
