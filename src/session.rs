//! Session persistence and the signed-in user
//!
//! The session is two string values under fixed keys: the bearer token and
//! the serialized user record. They are read once at startup, written on
//! login/registration and removed on logout. Nothing else writes them.

use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::models::User;

/// Key holding the bearer token
pub const TOKEN_KEY: &str = "token";

/// Key holding the JSON-serialized user
pub const USER_KEY: &str = "user";

/// Session storage errors
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Could not access session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Session file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

// =============================================================================
// Storage Backends
// =============================================================================

/// Persistent string key/value storage for session values
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove(&self, key: &str) -> Result<(), SessionError>;
}

/// In-memory store, lost when the process exits
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.values).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        lock(&self.values).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        lock(&self.values).remove(key);
        Ok(())
    }
}

/// JSON file store, rewritten on every change
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, loading existing values if the file exists
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, SessionError> {
        let path = path.into();
        let values = if path.exists() {
            let raw = fs::read_to_string(&path).map_err(|source| SessionError::Io {
                path: path.clone(),
                source,
            })?;
            parse_values(&raw)?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    fn flush(&self, values: &BTreeMap<String, String>) -> Result<(), SessionError> {
        let io_err = |source| SessionError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let json = serde_json::to_string_pretty(values)?;
        fs::write(&self.path, json).map_err(io_err)
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.values).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut values = lock(&self.values);
        values.insert(key.to_string(), value.to_string());
        self.flush(&values)
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut values = lock(&self.values);
        if values.remove(key).is_some() {
            self.flush(&values)?;
        }
        Ok(())
    }
}

/// Only string values are kept, anything else in the file is ignored
fn parse_values(raw: &str) -> Result<BTreeMap<String, String>, SessionError> {
    if raw.trim().is_empty() {
        return Ok(BTreeMap::new());
    }
    let map: BTreeMap<String, Value> = serde_json::from_str(raw)?;
    Ok(map
        .into_iter()
        .filter_map(|(k, v)| match v {
            Value::String(s) => Some((k, s)),
            _ => None,
        })
        .collect())
}

/// A poisoned lock still holds usable string data
fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

// =============================================================================
// Session
// =============================================================================

/// The current signed-in user, backed by a [`SessionStore`]
pub struct Session {
    store: Arc<dyn SessionStore>,
    user: Option<User>,
}

impl Session {
    /// Restore the session from storage
    ///
    /// Authenticated only when both the token and a parseable user record are
    /// present; otherwise starts signed out.
    pub fn hydrate(store: Arc<dyn SessionStore>) -> Self {
        let user = match (store.get(TOKEN_KEY), store.get(USER_KEY)) {
            (Some(_), Some(raw)) => match serde_json::from_str::<User>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!(error = %e, "stored user record is unreadable, starting signed out");
                    None
                }
            },
            _ => None,
        };

        if let Some(ref user) = user {
            tracing::debug!(user = %user.name, "session restored");
        }

        Self { store, user }
    }

    /// Persist user and token, then mark the user as signed in
    ///
    /// The token is written last, so a failed write never leaves a token
    /// behind without its user record.
    pub fn set_session(&mut self, user: User, token: &str) -> Result<(), SessionError> {
        let raw = serde_json::to_string(&user)?;
        self.store.set(USER_KEY, &raw)?;
        if let Err(e) = self.store.set(TOKEN_KEY, token) {
            if let Err(cleanup) = self.store.remove(USER_KEY) {
                tracing::warn!(error = %cleanup, "failed to roll back stored user");
            }
            return Err(e);
        }
        self.user = Some(user);
        Ok(())
    }

    /// Remove both persisted values and sign out
    ///
    /// The in-memory user is cleared even if storage fails.
    pub fn clear_session(&mut self) -> Result<(), SessionError> {
        self.user = None;
        let token = self.store.remove(TOKEN_KEY);
        let user = self.store.remove(USER_KEY);
        token.and(user)
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Current token straight from storage
    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("user", &self.user).finish()
    }
}
