//! Integration tests for CineHub
//!
//! Tests are organized by component:
//! - api_test: REST client (query params, bearer header, error mapping)
//! - session_test: Session persistence across restarts
//! - catalog_test: Catalog view (initial load, search, genre filter)
//! - detail_test: Detail view (member calls, favorites, reviews)
//! - profile_test: Profile view (favorites and watch history)
//! - auth_test: Login/register/logout flows through the App

// Note: Each test file is a separate integration test crate
// Tests are run individually by cargo, not via mod.rs
