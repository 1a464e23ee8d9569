//! View controllers
//!
//! Each screen owns its state and the fetch sequence that fills it. Views
//! share nothing but the session flag passed in and the notification queue.
//! Rendering is left to the front end.

pub mod auth_dialog;
pub mod catalog;
pub mod detail;
pub mod profile;

pub use auth_dialog::{AuthDialog, AuthForm, AuthMode, DialogState};
pub use catalog::CatalogView;
pub use detail::{ActionOutcome, DetailView};
pub use profile::ProfileView;

use std::collections::VecDeque;

/// Fallback message for failures without a server-provided reason
pub const GENERIC_ERROR: &str = "Something went wrong";

// =============================================================================
// Loading State
// =============================================================================

/// Loading state for async operations
#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadingState {
    /// Idle - no loading in progress
    #[default]
    Idle,
    /// Request in flight
    Loading,
    /// Error with message
    Error(String),
}

impl LoadingState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, LoadingState::Error(_))
    }
}

// =============================================================================
// Notifications
// =============================================================================

/// Severity of a transient notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

/// A transient, user-facing message ("toast")
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: Level,
    pub message: String,
}

/// FIFO of notices waiting to be shown
#[derive(Debug, Default)]
pub struct Notifications {
    queue: VecDeque<Notice>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Level::Success, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Level::Error, message.into());
    }

    fn push(&mut self, level: Level, message: String) {
        self.queue.push_back(Notice { level, message });
    }

    /// Most recent notice, without removing it
    pub fn last(&self) -> Option<&Notice> {
        self.queue.back()
    }

    /// Take every pending notice, oldest first
    pub fn drain(&mut self) -> Vec<Notice> {
        self.queue.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
