//! Key-value session surface and the decoding of the current user record.

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard, PoisonError},
};

use shared::domain::User;
use tracing::warn;

use crate::SessionStore;

pub const USER_KEY: &str = "user";
pub const JWT_KEY: &str = "jwt";

/// Reads the `user` record. A missing or undecodable record means "unauthenticated".
pub fn current_user(store: &dyn SessionStore) -> Option<User> {
    let raw = store.get_item(USER_KEY)?;
    match serde_json::from_str::<User>(&raw) {
        Ok(user) => Some(user),
        Err(err) => {
            warn!(error = %err, "ignoring undecodable session user record");
            None
        }
    }
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(user: &User) -> Self {
        let store = Self::new();
        store.set_user(user);
        store
    }

    pub fn set_user(&self, user: &User) {
        match serde_json::to_string(user) {
            Ok(raw) => self.set_item(USER_KEY, raw),
            Err(err) => warn!(error = %err, "failed to encode session user record"),
        }
    }

    pub fn clear(&self) {
        self.items().clear();
    }

    fn items(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for MemorySessionStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: String) {
        self.items().insert(key.to_string(), value);
    }

    fn remove_item(&self, key: &str) {
        self.items().remove(key);
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
