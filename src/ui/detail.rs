//! Detail view for a single movie
//!
//! Shows the movie, its reviews, and for signed-in users the favorite flag.
//! Opening the view as a signed-in user also records a watch-history entry.

use crate::api::{Api, ApiError};
use crate::models::{Movie, Review, ReviewDraft, MAX_RATING, MIN_RATING};
use crate::ui::{LoadingState, Notifications, GENERIC_ERROR};

const MOVIE_LOAD_FAILED: &str = "Could not load movie";
const FAVORITE_ADDED: &str = "Added to favorites";
const FAVORITE_REMOVED: &str = "Removed from favorites";
const REVIEW_EMPTY: &str = "Please write a review";
const REVIEW_SENT: &str = "Review submitted";
const REVIEW_FAILED: &str = "Could not submit review";

/// Result of a user action on the detail view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The server accepted the change
    Done,
    /// The request was sent and failed
    Failed,
    /// Nothing was sent (no movie open, or local validation failed)
    Skipped,
    /// Nothing was sent; the user must sign in first
    AuthRequired,
}

/// Detail view state
#[derive(Debug, Clone)]
pub struct DetailView {
    /// Id from the route
    pub movie_id: Option<String>,
    pub movie: Option<Movie>,
    pub reviews: Vec<Review>,
    /// Whether the movie is in the signed-in user's favorites
    pub is_favorite: bool,
    /// Star rating of the review being written, 1..=5
    pub rating: u8,
    /// Text of the review being written
    pub comment: String,
    pub loading: LoadingState,
}

impl Default for DetailView {
    fn default() -> Self {
        Self {
            movie_id: None,
            movie: None,
            reviews: Vec::new(),
            is_favorite: false,
            rating: MAX_RATING,
            comment: String::new(),
            loading: LoadingState::Idle,
        }
    }
}

impl DetailView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load everything for movie `id`
    ///
    /// Movie and reviews are always fetched. With a signed-in user the
    /// favorites list is checked for `id` and a zero-progress watch entry is
    /// posted. All requests run concurrently.
    pub async fn open(
        &mut self,
        id: &str,
        api: &Api,
        signed_in: bool,
        notices: &mut Notifications,
    ) {
        *self = Self {
            movie_id: Some(id.to_string()),
            loading: LoadingState::Loading,
            ..Self::default()
        };

        let member_checks = async {
            if signed_in {
                Some(tokio::join!(
                    api.authed.favorites(),
                    api.authed.record_watch(id, 0)
                ))
            } else {
                None
            }
        };

        let (movie, reviews, member) = tokio::join!(
            api.public.movie(id),
            api.public.reviews(id),
            member_checks
        );

        self.apply_movie(movie, notices);
        self.apply_reviews(reviews);

        if let Some((favorites, watch)) = member {
            match favorites {
                Ok(favorites) => self.is_favorite = favorites.iter().any(|m| m.id == id),
                Err(e) => tracing::warn!(error = %e, movie_id = id, "favorite check failed"),
            }
            if let Err(e) = watch {
                tracing::warn!(error = %e, movie_id = id, "failed to record watch history");
            }
        }
    }

    /// Pick a star rating; values outside 1..=5 are ignored
    pub fn set_rating(&mut self, rating: u8) {
        if (MIN_RATING..=MAX_RATING).contains(&rating) {
            self.rating = rating;
        }
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = comment.into();
    }

    /// Add or remove the open movie from favorites
    ///
    /// The local flag flips only after the server confirms.
    pub async fn toggle_favorite(
        &mut self,
        api: &Api,
        signed_in: bool,
        notices: &mut Notifications,
    ) -> ActionOutcome {
        if !signed_in {
            return ActionOutcome::AuthRequired;
        }
        let Some(id) = self.movie_id.clone() else {
            return ActionOutcome::Skipped;
        };

        let (result, message) = if self.is_favorite {
            (api.authed.remove_favorite(&id).await, FAVORITE_REMOVED)
        } else {
            (api.authed.add_favorite(&id).await, FAVORITE_ADDED)
        };

        match result {
            Ok(()) => {
                self.is_favorite = !self.is_favorite;
                notices.success(message);
                ActionOutcome::Done
            }
            Err(e) => {
                tracing::error!(error = %e, movie_id = %id, "failed to toggle favorite");
                notices.error(GENERIC_ERROR);
                ActionOutcome::Failed
            }
        }
    }

    /// Post the drafted review, then refresh reviews and the movie rating
    pub async fn submit_review(
        &mut self,
        api: &Api,
        signed_in: bool,
        notices: &mut Notifications,
    ) -> ActionOutcome {
        if !signed_in {
            return ActionOutcome::AuthRequired;
        }
        let comment = self.comment.trim();
        if comment.is_empty() {
            notices.error(REVIEW_EMPTY);
            return ActionOutcome::Skipped;
        }
        let Some(id) = self.movie_id.clone() else {
            return ActionOutcome::Skipped;
        };

        let draft = ReviewDraft {
            rating: self.rating,
            comment: comment.to_string(),
        };

        match api.authed.post_review(&id, &draft).await {
            Ok(()) => {
                notices.success(REVIEW_SENT);
                self.comment.clear();
                self.rating = MAX_RATING;
                self.refresh(&id, api, notices).await;
                ActionOutcome::Done
            }
            Err(e) => {
                tracing::error!(error = %e, movie_id = %id, "failed to submit review");
                notices.error(review_error_message(&e));
                ActionOutcome::Failed
            }
        }
    }

    /// Refetch reviews and the movie so the aggregate rating is current
    async fn refresh(&mut self, id: &str, api: &Api, notices: &mut Notifications) {
        let (reviews, movie) = tokio::join!(api.public.reviews(id), api.public.movie(id));
        self.apply_reviews(reviews);
        self.apply_movie(movie, notices);
    }

    fn apply_movie(&mut self, result: Result<Movie, ApiError>, notices: &mut Notifications) {
        match result {
            Ok(movie) => {
                self.movie = Some(movie);
                self.loading = LoadingState::Idle;
            }
            Err(e) => {
                tracing::error!(error = %e, movie_id = ?self.movie_id, "failed to fetch movie");
                notices.error(MOVIE_LOAD_FAILED);
                self.loading = LoadingState::Error(MOVIE_LOAD_FAILED.to_string());
            }
        }
    }

    fn apply_reviews(&mut self, result: Result<Vec<Review>, ApiError>) {
        match result {
            Ok(reviews) => self.reviews = reviews,
            Err(e) => tracing::error!(error = %e, movie_id = ?self.movie_id, "failed to fetch reviews"),
        }
    }
}

/// Only a 400 carries a reason meant for the user (e.g. a duplicate review)
fn review_error_message(err: &ApiError) -> String {
    match err {
        ApiError::Rejected {
            status: 400,
            detail: Some(detail),
        } => detail.clone(),
        _ => REVIEW_FAILED.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_rating_range() {
        let mut view = DetailView::new();
        assert_eq!(view.rating, 5);
        view.set_rating(3);
        assert_eq!(view.rating, 3);
        view.set_rating(0);
        view.set_rating(6);
        assert_eq!(view.rating, 3);
    }

    #[test]
    fn test_review_error_message() {
        let dup = ApiError::Rejected {
            status: 400,
            detail: Some("You already reviewed this movie".into()),
        };
        assert_eq!(review_error_message(&dup), "You already reviewed this movie");
        assert_eq!(review_error_message(&ApiError::ServerError(500)), REVIEW_FAILED);

        for status in [401, 403, 422] {
            let err = ApiError::Rejected {
                status,
                detail: Some("Could not validate credentials".into()),
            };
            assert_eq!(review_error_message(&err), REVIEW_FAILED);
        }
        let bare = ApiError::Rejected {
            status: 400,
            detail: None,
        };
        assert_eq!(review_error_message(&bare), REVIEW_FAILED);
        assert_eq!(
            review_error_message(&ApiError::Rejected { status: 401, detail: None }),
            REVIEW_FAILED
        );
    }
}
