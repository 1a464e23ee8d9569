//! Data structures and types for CineHub
//!
//! Contains the shared models used across the client, organized by domain:
//! - **Accounts**: users, login/register payloads and the auth response
//! - **Catalog**: movies and the query used to filter them
//! - **Reviews**: star ratings with comments
//! - **Library**: favorite and watch-history request bodies

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest star rating a review can carry
pub const MAX_RATING: u8 = 5;

/// Lowest star rating a review can carry
pub const MIN_RATING: u8 = 1;

/// Genre value meaning "no genre filter"
pub const ALL_GENRES: &str = "all";

// =============================================================================
// Account Models
// =============================================================================

/// A CineHub user as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// Body for `POST /auth/login`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body for `POST /auth/register`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Successful login or registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

// =============================================================================
// Catalog Models
// =============================================================================

/// A movie in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: String,
    pub title: String,
    pub description: String,
    /// Genre labels, first one is the primary genre
    pub genre: Vec<String>,
    pub year: u16,
    /// Runtime in minutes
    pub duration: u32,
    pub poster_url: String,
    pub trailer_url: String,
    #[serde(default)]
    pub rating_avg: f32,
    #[serde(default)]
    pub rating_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Movie {
    /// Primary genre label, if any
    pub fn primary_genre(&self) -> Option<&str> {
        self.genre.first().map(String::as_str)
    }

    /// Runtime formatted as `2h 28m`
    pub fn runtime(&self) -> String {
        let hours = self.duration / 60;
        let mins = self.duration % 60;
        if hours == 0 {
            format!("{}m", mins)
        } else {
            format!("{}h {}m", hours, mins)
        }
    }

    /// Embeddable player URL for the trailer
    ///
    /// Both `youtube.com/watch/<id>` style and `youtu.be/<id>` links end with
    /// the video id, so the last path segment is used.
    pub fn trailer_embed_url(&self) -> Option<String> {
        let video_id = self
            .trailer_url
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())?;
        Some(format!("https://www.youtube.com/embed/{}", video_id))
    }
}

impl fmt::Display for Movie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.year)?;
        if let Some(genre) = self.primary_genre() {
            write!(f, " {}", genre)?;
        }
        write!(f, " ★ {:.1}", self.rating_avg)
    }
}

/// Free-text and genre filter for `GET /movies`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieQuery {
    pub search: Option<String>,
    pub genre: Option<String>,
}

impl MovieQuery {
    pub fn new(search: impl Into<String>, genre: impl Into<String>) -> Self {
        Self {
            search: Some(search.into()),
            genre: Some(genre.into()),
        }
    }

    /// Query parameters to send, skipping empty values and the "all" genre
    pub fn params(&self) -> Vec<(&'static str, &str)> {
        let mut params = Vec::new();
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            params.push(("search", search));
        }
        if let Some(genre) = self
            .genre
            .as_deref()
            .filter(|g| !g.is_empty() && *g != ALL_GENRES)
        {
            params.push(("genre", genre));
        }
        params
    }
}

/// Response of `GET /genres`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GenreList {
    pub genres: Vec<String>,
}

// =============================================================================
// Review Models
// =============================================================================

/// A user review of a movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub user_name: String,
    pub movie_id: String,
    pub rating: u8,
    pub comment: String,
    pub created_at: String,
}

impl Review {
    /// Creation date as `YYYY-MM-DD`
    pub fn date(&self) -> String {
        format_date(&self.created_at)
    }
}

impl fmt::Display for Review {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({})\n  {}",
            stars(self.rating),
            self.user_name,
            self.date(),
            self.comment
        )
    }
}

/// Body for `POST /reviews/{movie_id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewDraft {
    pub rating: u8,
    pub comment: String,
}

// =============================================================================
// Library Models
// =============================================================================

/// Body for `POST /favorites`
#[derive(Debug, Clone, Serialize)]
pub(crate) struct FavoriteRequest<'a> {
    pub movie_id: &'a str,
}

/// Body for `POST /watch-history`
#[derive(Debug, Clone, Serialize)]
pub(crate) struct WatchHistoryRequest<'a> {
    pub movie_id: &'a str,
    pub progress: u8,
}

/// Plain `{"message": ...}` acknowledgement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ack {
    #[serde(default)]
    pub message: String,
}

// =============================================================================
// Formatting Helpers
// =============================================================================

/// Render a rating as filled and empty stars, e.g. `★★★☆☆`
pub fn stars(rating: u8) -> String {
    let filled = rating.min(MAX_RATING) as usize;
    let empty = MAX_RATING as usize - filled;
    format!("{}{}", "★".repeat(filled), "☆".repeat(empty))
}

/// Format an ISO-8601 timestamp as `YYYY-MM-DD`
///
/// Accepts RFC 3339 as well as timestamps without an offset. Anything else
/// falls back to the leading date portion of the string.
pub fn format_date(timestamp: &str) -> String {
    if let Ok(dt) = DateTime::parse_from_rfc3339(timestamp) {
        return dt.format("%Y-%m-%d").to_string();
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f") {
        return dt.format("%Y-%m-%d").to_string();
    }
    timestamp.chars().take(10).collect()
}
