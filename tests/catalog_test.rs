//! Catalog view tests
//!
//! Initial load, explicit search, genre filter and the featured movie.

use mockito::{Matcher, Server};
use serde_json::json;
use std::sync::Arc;

use cinehub::session::MemoryStore;
use cinehub::ui::{CatalogView, LoadingState, Notifications};
use cinehub::Api;

fn movie_json(id: &str, title: &str, genre: &str, rating: f32) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "description": format!("About {}", title),
        "genre": [genre],
        "year": 2010,
        "duration": 120,
        "poster_url": "",
        "trailer_url": "",
        "rating_avg": rating,
        "rating_count": 3
    })
}

fn api(url: &str) -> Api {
    Api::new(url, Arc::new(MemoryStore::new()))
}

// =============================================================================
// Initial Load
// =============================================================================

#[tokio::test]
async fn test_open_loads_genres_and_movies() {
    let mut server = Server::new_async().await;

    let genres = server
        .mock("GET", "/genres")
        .with_status(200)
        .with_body(r#"{"genres": ["Drama", "Sci-Fi"]}"#)
        .create_async()
        .await;
    let movies = server
        .mock("GET", "/movies")
        .with_status(200)
        .with_body(
            json!([
                movie_json("1", "Inception", "Sci-Fi", 4.5),
                movie_json("2", "Heat", "Drama", 4.8),
                movie_json("3", "Alien", "Sci-Fi", 4.8),
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let api = api(&server.url());
    let mut notices = Notifications::new();
    let mut view = CatalogView::new();
    view.open(&api, &mut notices).await;

    genres.assert_async().await;
    movies.assert_async().await;

    assert_eq!(view.genres, vec!["Drama", "Sci-Fi"]);
    assert_eq!(view.movies.len(), 3);
    assert!(!view.loading.is_loading());
    assert!(notices.is_empty());

    // Ties keep the earlier movie
    assert_eq!(view.featured().map(|m| m.title.as_str()), Some("Heat"));
}

#[tokio::test]
async fn test_genre_failure_keeps_movies() {
    let mut server = Server::new_async().await;

    let _genres = server
        .mock("GET", "/genres")
        .with_status(500)
        .create_async()
        .await;
    let _movies = server
        .mock("GET", "/movies")
        .with_status(200)
        .with_body(json!([movie_json("1", "Heat", "Drama", 4.0)]).to_string())
        .create_async()
        .await;

    let api = api(&server.url());
    let mut notices = Notifications::new();
    let mut view = CatalogView::new();
    view.open(&api, &mut notices).await;

    assert!(view.genres.is_empty());
    assert_eq!(view.movies.len(), 1);
    assert!(!view.loading.is_error());
}

#[tokio::test]
async fn test_movie_failure_shows_notice() {
    let mut server = Server::new_async().await;

    let _genres = server
        .mock("GET", "/genres")
        .with_status(200)
        .with_body(r#"{"genres": []}"#)
        .create_async()
        .await;
    let _movies = server
        .mock("GET", "/movies")
        .with_status(503)
        .create_async()
        .await;

    let api = api(&server.url());
    let mut notices = Notifications::new();
    let mut view = CatalogView::new();
    view.open(&api, &mut notices).await;

    assert_eq!(
        view.loading,
        LoadingState::Error("Could not load movies".into())
    );
    assert_eq!(
        notices.last().map(|n| n.message.as_str()),
        Some("Could not load movies")
    );
}

// =============================================================================
// Search & Filter
// =============================================================================

#[tokio::test]
async fn test_typing_does_not_fetch_until_submit() {
    let mut server = Server::new_async().await;

    let search = server
        .mock("GET", "/movies")
        .match_query(Matcher::Exact("search=Matrix".into()))
        .with_status(200)
        .with_body(json!([movie_json("9", "The Matrix", "Sci-Fi", 4.7)]).to_string())
        .expect(1)
        .create_async()
        .await;

    let api = api(&server.url());
    let mut notices = Notifications::new();
    let mut view = CatalogView::new();

    view.set_query("Mat");
    view.set_query("Matrix");
    view.submit_search(&api, &mut notices).await;

    search.assert_async().await;
    assert_eq!(view.movies.len(), 1);
    assert_eq!(view.movies[0].id, "9");
}

#[tokio::test]
async fn test_select_genre_refetches_with_both_filters() {
    let mut server = Server::new_async().await;

    let filtered = server
        .mock("GET", "/movies")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("search".into(), "the".into()),
            Matcher::UrlEncoded("genre".into(), "Drama".into()),
        ]))
        .with_status(200)
        .with_body(json!([movie_json("2", "The Godfather", "Drama", 4.9)]).to_string())
        .create_async()
        .await;

    let api = api(&server.url());
    let mut notices = Notifications::new();
    let mut view = CatalogView::new();

    view.set_query("the");
    view.select_genre("Drama", &api, &mut notices).await;

    filtered.assert_async().await;
    assert_eq!(view.genre, "Drama");
    assert_eq!(view.movies[0].title, "The Godfather");
}

#[tokio::test]
async fn test_empty_result_is_empty_state() {
    let mut server = Server::new_async().await;

    let _mock = server
        .mock("GET", "/movies")
        .match_query(Matcher::Exact("search=zzz".into()))
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let api = api(&server.url());
    let mut notices = Notifications::new();
    let mut view = CatalogView::new();

    view.set_query("zzz");
    view.submit_search(&api, &mut notices).await;

    assert!(view.is_empty_state());
    assert!(view.featured().is_none());
}
