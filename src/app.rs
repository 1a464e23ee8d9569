//! App state and core application logic
//!
//! Owns the session, the API clients, the current route and every view.
//! Routes actions that need a signed-in user through the auth dialog.

use anyhow::{Context, Result};
use std::fmt;
use std::sync::Arc;

use crate::api::Api;
use crate::config::Config;
use crate::models::AuthResponse;
use crate::session::{FileStore, Session, SessionStore};
use crate::ui::{
    ActionOutcome, AuthDialog, AuthMode, CatalogView, DetailView, Notifications, ProfileView,
    GENERIC_ERROR,
};

// =============================================================================
// Routes
// =============================================================================

/// Screen currently shown
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Route {
    /// Catalog with search and genre filter
    #[default]
    Catalog,
    /// Detail page for a movie id
    Detail(String),
    /// Favorites and watch history (signed-in only)
    Profile,
}

// =============================================================================
// Nav Bar
// =============================================================================

/// What the navigation bar offers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavBar {
    SignedIn { name: String },
    SignedOut,
}

impl fmt::Display for NavBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavBar::SignedIn { name } => write!(f, "CineHub | {} | profile | logout", name),
            NavBar::SignedOut => write!(f, "CineHub | login | register"),
        }
    }
}

// =============================================================================
// Main Application State
// =============================================================================

/// Main application state
#[derive(Debug)]
pub struct App {
    pub session: Session,
    pub api: Api,
    pub route: Route,
    pub catalog: CatalogView,
    pub detail: DetailView,
    pub profile: ProfileView,
    pub auth: AuthDialog,
    pub notices: Notifications,
}

impl App {
    /// Build the app over `store`, restoring any persisted session
    pub fn new(api_url: &str, store: Arc<dyn SessionStore>) -> Self {
        let session = Session::hydrate(Arc::clone(&store));
        Self {
            session,
            api: Api::new(api_url, store),
            route: Route::Catalog,
            catalog: CatalogView::new(),
            detail: DetailView::new(),
            profile: ProfileView::new(),
            auth: AuthDialog::new(),
            notices: Notifications::new(),
        }
    }

    /// Build the app from config, with the session kept in the session file
    pub fn start(config: &Config, api_url_override: Option<&str>) -> Result<Self> {
        let path = config
            .session_path()
            .context("Could not determine session file path")?;
        let store = FileStore::open(&path)
            .with_context(|| format!("Failed to open session file {}", path.display()))?;
        Ok(Self::new(&config.api_url(api_url_override), Arc::new(store)))
    }

    pub fn signed_in(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn nav_bar(&self) -> NavBar {
        match self.session.user() {
            Some(user) => NavBar::SignedIn {
                name: user.name.clone(),
            },
            None => NavBar::SignedOut,
        }
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    pub async fn go_catalog(&mut self) {
        self.route = Route::Catalog;
        self.catalog.open(&self.api, &mut self.notices).await;
    }

    pub async fn go_detail(&mut self, id: &str) {
        self.route = Route::Detail(id.to_string());
        let signed_in = self.signed_in();
        self.detail
            .open(id, &self.api, signed_in, &mut self.notices)
            .await;
    }

    /// Open the profile, or fall back to the catalog when signed out
    pub async fn go_profile(&mut self) -> &Route {
        if self.signed_in() {
            self.route = Route::Profile;
            self.profile.open(&self.api, &mut self.notices).await;
        } else {
            self.go_catalog().await;
        }
        &self.route
    }

    // -------------------------------------------------------------------------
    // Catalog actions
    // -------------------------------------------------------------------------

    pub async fn search(&mut self, query: &str) {
        self.catalog.set_query(query);
        self.catalog.submit_search(&self.api, &mut self.notices).await;
    }

    pub async fn select_genre(&mut self, genre: &str) {
        self.catalog
            .select_genre(genre, &self.api, &mut self.notices)
            .await;
    }

    // -------------------------------------------------------------------------
    // Detail actions
    // -------------------------------------------------------------------------

    pub async fn toggle_favorite(&mut self) -> ActionOutcome {
        let signed_in = self.signed_in();
        let outcome = self
            .detail
            .toggle_favorite(&self.api, signed_in, &mut self.notices)
            .await;
        self.require_auth(outcome)
    }

    pub async fn submit_review(&mut self, rating: u8, comment: &str) -> ActionOutcome {
        self.detail.set_rating(rating);
        self.detail.set_comment(comment);
        let signed_in = self.signed_in();
        let outcome = self
            .detail
            .submit_review(&self.api, signed_in, &mut self.notices)
            .await;
        self.require_auth(outcome)
    }

    fn require_auth(&mut self, outcome: ActionOutcome) -> ActionOutcome {
        if outcome == ActionOutcome::AuthRequired {
            self.auth.open(AuthMode::Login);
        }
        outcome
    }

    // -------------------------------------------------------------------------
    // Session actions
    // -------------------------------------------------------------------------

    pub fn open_auth(&mut self, mode: AuthMode) {
        self.auth.open(mode);
    }

    /// Submit the auth dialog; on success the session is stored
    pub async fn submit_auth(&mut self) -> bool {
        match self.auth.submit(&self.api, &mut self.notices).await {
            Some(response) => self.login_success(response),
            None => false,
        }
    }

    /// Persist the token and user returned by login or registration
    pub fn login_success(&mut self, response: AuthResponse) -> bool {
        match self
            .session
            .set_session(response.user, &response.access_token)
        {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(error = %e, "failed to persist session");
                self.notices.error(GENERIC_ERROR);
                false
            }
        }
    }

    /// Forget the session; the profile is not reachable afterwards
    pub fn logout(&mut self) {
        if let Err(e) = self.session.clear_session() {
            tracing::error!(error = %e, "failed to remove persisted session");
        }
        if self.route == Route::Profile {
            self.route = Route::Catalog;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::session::MemoryStore;

    fn app() -> App {
        App::new("http://127.0.0.1:9", Arc::new(MemoryStore::new()))
    }

    fn response() -> AuthResponse {
        AuthResponse {
            user: User {
                id: "u1".into(),
                name: "Ann".into(),
                email: "ann@example.com".into(),
                created_at: None,
            },
            access_token: "T".into(),
            token_type: "bearer".into(),
        }
    }

    #[test]
    fn test_nav_bar_follows_session() {
        let mut app = app();
        assert_eq!(app.nav_bar(), NavBar::SignedOut);

        assert!(app.login_success(response()));
        assert_eq!(
            app.nav_bar(),
            NavBar::SignedIn {
                name: "Ann".into()
            }
        );
        assert_eq!(app.nav_bar().to_string(), "CineHub | Ann | profile | logout");

        app.logout();
        assert_eq!(app.nav_bar(), NavBar::SignedOut);
    }

    #[test]
    fn test_logout_leaves_profile() {
        let mut app = app();
        app.login_success(response());
        app.route = Route::Profile;
        app.logout();
        assert_eq!(app.route, Route::Catalog);
        assert!(app.session.token().is_none());
    }

    #[test]
    fn test_unauthenticated_favorite_opens_login() {
        let mut app = app();
        app.detail.movie_id = Some("42".into());
        let outcome = tokio_test::block_on(app.toggle_favorite());
        assert_eq!(outcome, ActionOutcome::AuthRequired);
        assert_eq!(app.auth.mode(), Some(AuthMode::Login));
    }
}
