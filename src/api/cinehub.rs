//! CineHub REST API client
//!
//! One client type, two flavours: the public client sends requests as-is,
//! the authenticated client reads the bearer token from the session store on
//! every request. No retries, no timeout, no caching.

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::models::{
    Ack, AuthResponse, FavoriteRequest, GenreList, LoginRequest, Movie, MovieQuery,
    RegisterRequest, Review, ReviewDraft, User, WatchHistoryRequest,
};
use crate::session::{SessionStore, TOKEN_KEY};

/// CineHub API error types
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Resource not found (404)")]
    NotFound,

    #[error("Request rejected ({}): {}", .status, .detail.as_deref().unwrap_or("no detail"))]
    Rejected { status: u16, detail: Option<String> },

    #[error("Server error: {0}")]
    ServerError(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
}

impl ApiError {
    /// HTTP status, when the server answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound => Some(404),
            ApiError::Rejected { status, .. } => Some(*status),
            ApiError::ServerError(status) => Some(*status),
            _ => None,
        }
    }

    /// Server-provided `detail` message of a rejected request
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    /// True for 401/403, i.e. a missing or expired token
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

/// FastAPI error body. Validation errors carry a list instead of a string.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// CineHub API client
#[derive(Clone)]
pub struct CineHubClient {
    base_url: String,
    client: reqwest::Client,
    token_source: Option<Arc<dyn SessionStore>>,
}

impl CineHubClient {
    /// Create a client that never sends credentials
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize(base_url.into()),
            client: reqwest::Client::new(),
            token_source: None,
        }
    }

    /// Create a client that attaches the stored token to every request
    pub fn authenticated(base_url: impl Into<String>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            token_source: Some(store),
            ..Self::new(base_url)
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether this client injects a bearer token when one is stored
    pub fn is_authenticated(&self) -> bool {
        self.token_source.is_some()
    }

    /// Build a request, adding `Authorization` only if a token is stored now
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let token = self
            .token_source
            .as_ref()
            .and_then(|store| store.get(TOKEN_KEY));

        tracing::debug!(%method, %url, bearer = token.is_some(), "api request");

        let builder = self
            .client
            .request(method, url)
            .header("Accept", "application/json");
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Send a request and map the status to an [`ApiError`]
    async fn execute(&self, builder: RequestBuilder) -> Result<String, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        match status {
            s if s.is_success() => Ok(body),
            StatusCode::NOT_FOUND => Err(ApiError::NotFound),
            s if s.is_client_error() => Err(ApiError::Rejected {
                status: s.as_u16(),
                detail: extract_detail(&body),
            }),
            s => Err(ApiError::ServerError(s.as_u16())),
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let body = self.execute(self.request(Method::GET, path)).await?;
        parse(&body)
    }

    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        payload: &B,
    ) -> Result<T, ApiError> {
        let body = self
            .execute(self.request(Method::POST, path).json(payload))
            .await?;
        parse(&body)
    }

    /// POST where only success matters; the acknowledgement body is ignored
    async fn post_ack<B: Serialize + ?Sized>(&self, path: &str, payload: &B) -> Result<(), ApiError> {
        self.execute(self.request(Method::POST, path).json(payload))
            .await
            .map(|_| ())
    }

    // -------------------------------------------------------------------------
    // Catalog
    // -------------------------------------------------------------------------

    /// All genre labels, sorted by the server
    pub async fn genres(&self) -> Result<Vec<String>, ApiError> {
        let list: GenreList = self.get("/genres").await?;
        Ok(list.genres)
    }

    /// Movies matching the query; empty filters are not sent
    pub async fn movies(&self, query: &MovieQuery) -> Result<Vec<Movie>, ApiError> {
        let params = query.params();
        let mut builder = self.request(Method::GET, "/movies");
        if !params.is_empty() {
            builder = builder.query(&params);
        }
        let body = self.execute(builder).await?;
        parse(&body)
    }

    pub async fn movie(&self, id: &str) -> Result<Movie, ApiError> {
        self.get(&format!("/movies/{}", urlencoding::encode(id))).await
    }

    // -------------------------------------------------------------------------
    // Reviews
    // -------------------------------------------------------------------------

    pub async fn reviews(&self, movie_id: &str) -> Result<Vec<Review>, ApiError> {
        self.get(&format!("/reviews/{}", urlencoding::encode(movie_id)))
            .await
    }

    /// Post a review; a second review of the same movie is rejected with 400
    pub async fn post_review(&self, movie_id: &str, draft: &ReviewDraft) -> Result<(), ApiError> {
        self.post_ack(&format!("/reviews/{}", urlencoding::encode(movie_id)), draft)
            .await
    }

    // -------------------------------------------------------------------------
    // Favorites & watch history
    // -------------------------------------------------------------------------

    pub async fn favorites(&self) -> Result<Vec<Movie>, ApiError> {
        self.get("/favorites").await
    }

    pub async fn add_favorite(&self, movie_id: &str) -> Result<(), ApiError> {
        self.post_ack("/favorites", &FavoriteRequest { movie_id }).await
    }

    pub async fn remove_favorite(&self, movie_id: &str) -> Result<(), ApiError> {
        let path = format!("/favorites/{}", urlencoding::encode(movie_id));
        self.execute(self.request(Method::DELETE, &path))
            .await
            .map(|_| ())
    }

    pub async fn watch_history(&self) -> Result<Vec<Movie>, ApiError> {
        self.get("/watch-history").await
    }

    pub async fn record_watch(&self, movie_id: &str, progress: u8) -> Result<(), ApiError> {
        self.post_ack("/watch-history", &WatchHistoryRequest { movie_id, progress })
            .await
    }

    // -------------------------------------------------------------------------
    // Accounts
    // -------------------------------------------------------------------------

    pub async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.post("/auth/login", credentials).await
    }

    pub async fn register(&self, registration: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        self.post("/auth/register", registration).await
    }

    /// The user the current token belongs to
    pub async fn me(&self) -> Result<User, ApiError> {
        self.get("/auth/me").await
    }

    /// Load the sample catalog on an empty server
    pub async fn seed(&self) -> Result<Ack, ApiError> {
        let body = self
            .execute(self.request(Method::POST, "/init-data"))
            .await?;
        Ok(serde_json::from_str(&body).unwrap_or(Ack {
            message: body.trim().to_string(),
        }))
    }
}

impl std::fmt::Debug for CineHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CineHubClient")
            .field("base_url", &self.base_url)
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

fn normalize(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}

fn parse<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body)
        .map_err(|e| ApiError::InvalidResponse(format!("JSON parse error: {}", e)))
}

/// Pull a human-readable `detail` string out of an error body
fn extract_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Array(items) => items
            .iter()
            .find_map(|item| item.get("msg").and_then(|m| m.as_str()))
            .map(str::to_string),
        _ => None,
    }
}
