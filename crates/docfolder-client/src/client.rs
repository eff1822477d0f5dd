//! Authenticated HTTP client for the document API.
//!
//! Every call is a single attempt: no retries, no backoff. Requests on the
//! `/protected` routes carry the session's bearer token; a 401 on those
//! routes clears the session and surfaces [`ClientError::Unauthorized`]
//! without reading the body. Any other response is handed back unchanged
//! to the feature operation, which decodes either the payload or the
//! server's `{error}` document.

use std::sync::Arc;

use docfolder_api_models::{
    Credentials, DocumentCreateRequest, DocumentUpdateRequest, ErrorBody, RecommendationQuery,
    RegisterResponse, TokenResponse,
};
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::{ClientConfig, HEADER_REQUEST_ID};
use crate::error::{ClientError, ClientResult};
use crate::session::Session;

/// `POST` endpoint creating an account.
pub const PATH_REGISTER: &str = "/register";
/// `POST` endpoint exchanging credentials for a bearer token.
pub const PATH_LOGIN: &str = "/login";
/// Collection endpoint for documents.
pub const PATH_DOCUMENTS: &str = "/protected/documents";
/// Folder recommendation endpoint.
pub const PATH_RECOMMENDED_FOLDER: &str = "/protected/folders/recommended";

const NO_BODY: Option<&()> = None;

/// HTTP client bound to an API root and a [`Session`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    config: ClientConfig,
    session: Arc<Session>,
}

impl ApiClient {
    /// Build a client from `config`, sharing `session` with the caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the request identifier is not a valid header value
    /// or the underlying HTTP client cannot be constructed.
    pub fn new(config: ClientConfig, session: Arc<Session>) -> ClientResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(request_id) = &config.request_id {
            let value = HeaderValue::from_str(request_id).map_err(|_| {
                ClientError::InvalidHeader {
                    name: HEADER_REQUEST_ID,
                }
            })?;
            default_headers.insert(HEADER_REQUEST_ID, value);
        }

        let mut builder = Client::builder().default_headers(default_headers);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|source| ClientError::Build { source })?;

        Ok(Self {
            http,
            config,
            session,
        })
    }

    /// Session backing this client.
    #[must_use]
    pub const fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Configuration the client was built with.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Issue an unauthenticated request and return the raw response.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the request cannot be sent.
    pub async fn send<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ClientResult<Response>
    where
        B: Serialize + ?Sized,
    {
        let url = self.config.endpoint(path)?;
        let request = self.request(method.clone(), url, body);
        dispatch(request, &method, path).await
    }

    /// Issue a request carrying the session's bearer token.
    ///
    /// A 401 clears the session, notifies the status collaborator, and fails
    /// with [`ClientError::Unauthorized`]; any other response is returned
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the request cannot be sent, or
    /// the server rejects the token.
    pub async fn send_authenticated<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ClientResult<Response>
    where
        B: Serialize + ?Sized,
    {
        let url = self.config.endpoint(path)?;
        self.execute_authenticated(method, url, path, body).await
    }

    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Api`] with the server's message when registration
    /// is refused, or a transport error.
    pub async fn register(&self, credentials: &Credentials) -> ClientResult<RegisterResponse> {
        let response = self
            .send(Method::POST, PATH_REGISTER, Some(credentials))
            .await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| ClientError::Decode {
                path: PATH_REGISTER.to_string(),
                source,
            })?;
        Ok(serde_json::from_slice(&bytes).unwrap_or_default())
    }

    /// Exchange credentials for a bearer token and store it in the session.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Api`] when the server refuses the credentials,
    /// [`ClientError::Decode`] or [`ClientError::EmptyToken`] if no token is
    /// returned, or [`ClientError::Store`] if the token cannot be persisted.
    pub async fn login(&self, credentials: &Credentials) -> ClientResult<()> {
        let response = self
            .send(Method::POST, PATH_LOGIN, Some(credentials))
            .await?;
        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let tokens: TokenResponse = decode(response, PATH_LOGIN).await?;
        if tokens.access_token.is_empty() {
            return Err(ClientError::EmptyToken {
                path: PATH_LOGIN.to_string(),
            });
        }
        self.session.authenticate(tokens.access_token)?;
        Ok(())
    }

    /// Forget the stored token. Safe to call when already logged out.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Store`] if the persisted token cannot be removed.
    pub fn logout(&self) -> ClientResult<()> {
        self.session.logout()?;
        Ok(())
    }

    /// Create a document and return the server's representation of it.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Unauthorized`] if the session is rejected,
    /// [`ClientError::Api`] on validation failures, or a transport error.
    pub async fn create_document(&self, request: &DocumentCreateRequest) -> ClientResult<Value> {
        let response = self
            .send_authenticated(Method::POST, PATH_DOCUMENTS, Some(request))
            .await?;
        json_or_api_error(response, PATH_DOCUMENTS).await
    }

    /// Fetch a document by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Unauthorized`] if the session is rejected,
    /// [`ClientError::Api`] when the document does not exist, or a transport error.
    pub async fn get_document(&self, id: u64) -> ClientResult<Value> {
        let path = document_path(id);
        let response = self
            .send_authenticated(Method::GET, &path, NO_BODY)
            .await?;
        json_or_api_error(response, &path).await
    }

    /// Apply a partial update to a document.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Unauthorized`] if the session is rejected,
    /// [`ClientError::Api`] on validation failures, or a transport error.
    pub async fn update_document(
        &self,
        id: u64,
        request: &DocumentUpdateRequest,
    ) -> ClientResult<Value> {
        let path = document_path(id);
        let response = self
            .send_authenticated(Method::PUT, &path, Some(request))
            .await?;
        json_or_api_error(response, &path).await
    }

    /// Delete a document.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Unauthorized`] if the session is rejected,
    /// [`ClientError::Api`] when the server refuses, or a transport error.
    pub async fn delete_document(&self, id: u64) -> ClientResult<()> {
        let path = document_path(id);
        let response = self
            .send_authenticated(Method::DELETE, &path, NO_BODY)
            .await?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(api_error(response).await)
        }
    }

    /// Ask the server where a document of this type and size should be filed.
    ///
    /// A JSON `null` answer means no folder fits and yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Unauthorized`] if the session is rejected,
    /// [`ClientError::Api`] on invalid parameters, or a transport error.
    pub async fn recommended_folder(
        &self,
        query: &RecommendationQuery,
    ) -> ClientResult<Option<Value>> {
        let mut url = self.config.endpoint(PATH_RECOMMENDED_FOLDER)?;
        url.query_pairs_mut().extend_pairs(query.query_pairs());

        let response = self
            .execute_authenticated(Method::GET, url, PATH_RECOMMENDED_FOLDER, NO_BODY)
            .await?;
        json_or_api_error(response, PATH_RECOMMENDED_FOLDER).await
    }

    async fn execute_authenticated<B>(
        &self,
        method: Method,
        url: Url,
        path: &str,
        body: Option<&B>,
    ) -> ClientResult<Response>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self.request(method.clone(), url, body);
        if let Some(token) = self.session.token() {
            request = request.bearer_auth(token);
        }

        let response = dispatch(request, &method, path).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            if let Err(err) = self.session.expire() {
                tracing::warn!(error = %err, "failed to clear persisted session after 401");
            }
            return Err(ClientError::Unauthorized);
        }
        Ok(response)
    }

    fn request<B>(&self, method: Method, url: Url, body: Option<&B>) -> RequestBuilder
    where
        B: Serialize + ?Sized,
    {
        let request = self.http.request(method, url);
        match body {
            Some(body) => request.json(body),
            None => request,
        }
    }
}

async fn dispatch(request: RequestBuilder, method: &Method, path: &str) -> ClientResult<Response> {
    let response = request.send().await.map_err(|source| {
        tracing::debug!(%method, path, error = %source, "api request failed");
        ClientError::Transport {
            path: path.to_string(),
            source,
        }
    })?;
    tracing::debug!(
        %method,
        path,
        status = response.status().as_u16(),
        "api response"
    );
    Ok(response)
}

fn document_path(id: u64) -> String {
    format!("{PATH_DOCUMENTS}/{id}")
}

async fn json_or_api_error<T>(response: Response, path: &str) -> ClientResult<T>
where
    T: DeserializeOwned,
{
    if response.status().is_success() {
        decode(response, path).await
    } else {
        Err(api_error(response).await)
    }
}

async fn decode<T>(response: Response, path: &str) -> ClientResult<T>
where
    T: DeserializeOwned,
{
    response
        .json::<T>()
        .await
        .map_err(|source| ClientError::Decode {
            path: path.to_string(),
            source,
        })
}

/// Turn a non-success response into [`ClientError::Api`].
///
/// Bodies that are not an `{error}` document fall back to a status-based message.
async fn api_error(response: Response) -> ClientError {
    let status = response.status();
    let bytes = response.bytes().await.unwrap_or_default();
    let message = serde_json::from_slice::<ErrorBody>(&bytes)
        .ok()
        .map(|body| body.error)
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| format!("request failed with status {status}"));
    ClientError::Api { status, message }
}
