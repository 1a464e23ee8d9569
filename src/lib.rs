//! CineHub - client for the CineHub movie catalog
//!
//! Browse and search movies, read and write reviews, keep favorites and a
//! watch history. The server is the source of truth; the client re-fetches
//! after every change.
//!
//! # Modules
//!
//! - `models` - Users, movies, reviews and request bodies
//! - `api` - REST client, public and token-carrying
//! - `session` - Persisted token and signed-in user
//! - `ui` - View controllers (catalog, detail, profile, auth dialog)
//! - `app` - Routing, nav bar and session actions
//! - `config` - Config file and API URL resolution

pub mod api;
pub mod app;
pub mod config;
pub mod models;
pub mod session;
pub mod ui;

// Re-export commonly used types
pub use models::{AuthResponse, Movie, MovieQuery, Review, ReviewDraft, User};

pub use api::{Api, ApiError, CineHubClient};
pub use app::{App, NavBar, Route};
pub use session::{FileStore, MemoryStore, Session, SessionStore};
