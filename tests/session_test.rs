//! Session persistence tests
//!
//! The session file must survive a restart and be cleared by logout.

use std::sync::Arc;

use cinehub::models::User;
use cinehub::session::{FileStore, Session, SessionStore, TOKEN_KEY, USER_KEY};

fn ann() -> User {
    User {
        id: "u1".into(),
        name: "Ann".into(),
        email: "ann@example.com".into(),
        created_at: None,
    }
}

#[test]
fn test_session_restored_after_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    {
        let store = Arc::new(FileStore::open(&path).unwrap());
        let mut session = Session::hydrate(store);
        assert!(!session.is_authenticated());
        session.set_session(ann(), "T").unwrap();
    }

    let store = Arc::new(FileStore::open(&path).unwrap());
    let session = Session::hydrate(store);

    assert!(session.is_authenticated());
    assert_eq!(session.user(), Some(&ann()));
    assert_eq!(session.token().as_deref(), Some("T"));
}

#[test]
fn test_logout_clears_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let store = Arc::new(FileStore::open(&path).unwrap());
    let mut session = Session::hydrate(store);
    session.set_session(ann(), "T").unwrap();
    session.clear_session().unwrap();
    assert!(!session.is_authenticated());

    let reopened = FileStore::open(&path).unwrap();
    assert!(reopened.get(TOKEN_KEY).is_none());
    assert!(reopened.get(USER_KEY).is_none());
}

#[test]
fn test_unreadable_user_starts_signed_out() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let store = FileStore::open(&path).unwrap();
    store.set(TOKEN_KEY, "T").unwrap();
    store.set(USER_KEY, "{not a user").unwrap();

    let session = Session::hydrate(Arc::new(store));
    assert!(!session.is_authenticated());
    assert!(session.user().is_none());
}

#[test]
fn test_token_without_user_is_signed_out() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let store = FileStore::open(&path).unwrap();
    store.set(TOKEN_KEY, "T").unwrap();

    let session = Session::hydrate(Arc::new(store));
    assert!(!session.is_authenticated());
}

#[test]
fn test_corrupt_session_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    std::fs::write(&path, "][").unwrap();

    assert!(FileStore::open(&path).is_err());
}
