//! API access for the CineHub backend
//!
//! - `cinehub`: typed REST client (public and token-carrying flavours)

pub mod cinehub;

pub use cinehub::{ApiError, CineHubClient};

use std::sync::Arc;

use crate::session::SessionStore;

/// The pair of clients every view works with
///
/// `public` never sends credentials; `authed` reads the stored token on each
/// request and sends it as a bearer header when present.
#[derive(Debug, Clone)]
pub struct Api {
    pub public: CineHubClient,
    pub authed: CineHubClient,
}

impl Api {
    pub fn new(base_url: &str, store: Arc<dyn SessionStore>) -> Self {
        Self {
            public: CineHubClient::new(base_url),
            authed: CineHubClient::authenticated(base_url, store),
        }
    }
}
