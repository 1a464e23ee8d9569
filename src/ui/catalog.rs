//! Catalog view
//!
//! Genre list, filtered movie grid and the featured (top-rated) movie.
//! Searches run only on explicit submit; changing the genre refetches
//! immediately.

use crate::api::{Api, ApiError};
use crate::models::{Movie, MovieQuery, ALL_GENRES};
use crate::ui::{LoadingState, Notifications};

const MOVIES_LOAD_FAILED: &str = "Could not load movies";

/// Catalog view state
#[derive(Debug, Clone)]
pub struct CatalogView {
    /// Genre labels for the filter
    pub genres: Vec<String>,
    /// Currently loaded movies
    pub movies: Vec<Movie>,
    /// Search text being edited
    pub query: String,
    /// Selected genre, `"all"` for none
    pub genre: String,
    pub loading: LoadingState,
}

impl Default for CatalogView {
    fn default() -> Self {
        Self {
            genres: Vec::new(),
            movies: Vec::new(),
            query: String::new(),
            genre: ALL_GENRES.to_string(),
            loading: LoadingState::Idle,
        }
    }
}

impl CatalogView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial load: genres and the unfiltered movie list, concurrently
    pub async fn open(&mut self, api: &Api, notices: &mut Notifications) {
        self.loading = LoadingState::Loading;
        let query = self.movie_query();

        let (genres, movies) = tokio::join!(api.public.genres(), api.public.movies(&query));

        match genres {
            Ok(genres) => self.genres = genres,
            Err(e) => tracing::error!(error = %e, "failed to fetch genres"),
        }
        self.apply_movies(movies, notices);
    }

    /// Edit the search text; nothing is fetched until [`submit_search`]
    ///
    /// [`submit_search`]: CatalogView::submit_search
    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    /// Run the search with the current text and genre
    pub async fn submit_search(&mut self, api: &Api, notices: &mut Notifications) {
        self.fetch_movies(api, notices).await;
    }

    /// Change the genre filter and refetch right away
    pub async fn select_genre(
        &mut self,
        genre: impl Into<String>,
        api: &Api,
        notices: &mut Notifications,
    ) {
        self.genre = genre.into();
        self.fetch_movies(api, notices).await;
    }

    /// Current filters as an API query
    pub fn movie_query(&self) -> MovieQuery {
        MovieQuery::new(self.query.clone(), self.genre.clone())
    }

    /// Highest-rated loaded movie; the first one wins a tie
    pub fn featured(&self) -> Option<&Movie> {
        self.movies.iter().fold(None, |best: Option<&Movie>, m| match best {
            Some(b) if b.rating_avg >= m.rating_avg => Some(b),
            _ => Some(m),
        })
    }

    /// Loaded, and nothing matched
    pub fn is_empty_state(&self) -> bool {
        !self.loading.is_loading() && self.movies.is_empty()
    }

    async fn fetch_movies(&mut self, api: &Api, notices: &mut Notifications) {
        self.loading = LoadingState::Loading;
        let result = api.public.movies(&self.movie_query()).await;
        self.apply_movies(result, notices);
    }

    fn apply_movies(
        &mut self,
        result: Result<Vec<Movie>, ApiError>,
        notices: &mut Notifications,
    ) {
        match result {
            Ok(movies) => {
                tracing::debug!(count = movies.len(), "movies loaded");
                self.movies = movies;
                self.loading = LoadingState::Idle;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to fetch movies");
                notices.error(MOVIES_LOAD_FAILED);
                self.loading = LoadingState::Error(MOVIES_LOAD_FAILED.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: &str, rating: f32) -> Movie {
        Movie {
            id: id.into(),
            title: format!("Movie {}", id),
            description: String::new(),
            genre: vec!["Drama".into()],
            year: 2000,
            duration: 100,
            poster_url: String::new(),
            trailer_url: String::new(),
            rating_avg: rating,
            rating_count: 1,
            created_at: None,
        }
    }

    #[test]
    fn test_featured_picks_highest_rating() {
        let mut view = CatalogView::new();
        assert!(view.featured().is_none());

        view.movies = vec![movie("a", 3.0), movie("b", 4.8), movie("c", 4.1)];
        assert_eq!(view.featured().map(|m| m.id.as_str()), Some("b"));
    }

    #[test]
    fn test_featured_tie_keeps_first() {
        let mut view = CatalogView::new();
        view.movies = vec![movie("a", 4.0), movie("b", 4.0), movie("c", 1.0)];
        assert_eq!(view.featured().map(|m| m.id.as_str()), Some("a"));
    }

    #[test]
    fn test_default_query_is_unfiltered() {
        let view = CatalogView::new();
        assert_eq!(view.genre, "all");
        assert!(view.movie_query().params().is_empty());
    }

    #[test]
    fn test_set_query_does_not_touch_results() {
        let mut view = CatalogView::new();
        view.movies = vec![movie("a", 1.0)];
        view.set_query("Matrix");
        assert_eq!(view.query, "Matrix");
        assert_eq!(view.movies.len(), 1);
        assert!(!view.is_empty_state());
    }
}
