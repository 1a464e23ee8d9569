//! Profile view: the signed-in user's favorites and watch history

use crate::api::Api;
use crate::models::Movie;
use crate::ui::{LoadingState, Notifications};

const FAVORITES_LOAD_FAILED: &str = "Could not load favorites";
const HISTORY_LOAD_FAILED: &str = "Could not load watch history";

/// Profile view state
#[derive(Debug, Clone, Default)]
pub struct ProfileView {
    pub favorites: Vec<Movie>,
    pub watch_history: Vec<Movie>,
    pub loading: LoadingState,
}

impl ProfileView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch both lists; each one fails on its own
    pub async fn open(&mut self, api: &Api, notices: &mut Notifications) {
        self.loading = LoadingState::Loading;

        let (favorites, history) = tokio::join!(api.authed.favorites(), api.authed.watch_history());

        match favorites {
            Ok(movies) => self.favorites = movies,
            Err(e) => {
                tracing::error!(error = %e, "failed to fetch favorites");
                notices.error(FAVORITES_LOAD_FAILED);
            }
        }
        match history {
            Ok(movies) => self.watch_history = movies,
            Err(e) => {
                tracing::error!(error = %e, "failed to fetch watch history");
                notices.error(HISTORY_LOAD_FAILED);
            }
        }

        self.loading = LoadingState::Idle;
    }

    pub fn favorites_empty(&self) -> bool {
        !self.loading.is_loading() && self.favorites.is_empty()
    }

    pub fn history_empty(&self) -> bool {
        !self.loading.is_loading() && self.watch_history.is_empty()
    }
}
