//! Profile view tests

use mockito::Server;
use serde_json::json;
use std::sync::Arc;

use cinehub::session::{MemoryStore, SessionStore, TOKEN_KEY};
use cinehub::ui::{Notifications, ProfileView};
use cinehub::Api;

fn api(url: &str) -> Api {
    let store = Arc::new(MemoryStore::new());
    store.set(TOKEN_KEY, "T").unwrap();
    Api::new(url, store)
}

fn movie_json(id: &str, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "title": title,
        "description": "",
        "genre": ["Drama"],
        "year": 2001,
        "duration": 95,
        "poster_url": "",
        "trailer_url": "",
        "rating_avg": 0.0,
        "rating_count": 0
    })
}

#[tokio::test]
async fn test_open_loads_both_lists() {
    let mut server = Server::new_async().await;

    let favorites = server
        .mock("GET", "/favorites")
        .match_header("authorization", "Bearer T")
        .with_status(200)
        .with_body(json!([movie_json("1", "Amélie")]).to_string())
        .create_async()
        .await;
    let history = server
        .mock("GET", "/watch-history")
        .match_header("authorization", "Bearer T")
        .with_status(200)
        .with_body(json!([movie_json("2", "Memento"), movie_json("1", "Amélie")]).to_string())
        .create_async()
        .await;

    let mut notices = Notifications::new();
    let mut view = ProfileView::new();
    view.open(&api(&server.url()), &mut notices).await;

    favorites.assert_async().await;
    history.assert_async().await;

    assert_eq!(view.favorites.len(), 1);
    assert_eq!(view.watch_history[0].title, "Memento");
    assert!(!view.favorites_empty());
    assert!(!view.history_empty());
    assert!(notices.is_empty());
}

#[tokio::test]
async fn test_empty_lists_show_empty_states() {
    let mut server = Server::new_async().await;

    let _favorites = server
        .mock("GET", "/favorites")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;
    let _history = server
        .mock("GET", "/watch-history")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let mut notices = Notifications::new();
    let mut view = ProfileView::new();
    view.open(&api(&server.url()), &mut notices).await;

    assert!(view.favorites_empty());
    assert!(view.history_empty());
}

#[tokio::test]
async fn test_lists_fail_independently() {
    let mut server = Server::new_async().await;

    let _favorites = server
        .mock("GET", "/favorites")
        .with_status(500)
        .create_async()
        .await;
    let _history = server
        .mock("GET", "/watch-history")
        .with_status(200)
        .with_body(json!([movie_json("2", "Memento")]).to_string())
        .create_async()
        .await;

    let mut notices = Notifications::new();
    let mut view = ProfileView::new();
    view.open(&api(&server.url()), &mut notices).await;

    assert!(view.favorites.is_empty());
    assert_eq!(view.watch_history.len(), 1);
    assert!(!view.loading.is_loading());

    let messages: Vec<_> = notices.drain().into_iter().map(|n| n.message).collect();
    assert_eq!(messages, vec!["Could not load favorites"]);
}
