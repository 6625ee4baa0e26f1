//! Password-gated admin session.
//!
//! Kept apart from the visualizer: the rest of the crate only asks whether a
//! session already exists at startup.

use crate::config::{ADMIN_PASSWORD_STORAGE_KEY, ADMIN_SESSION_STORAGE_KEY, DEFAULT_ADMIN_PASSWORD};
use crate::storage::{KeyValueStore, StorageError};
use log::{info, warn};

const SESSION_ACTIVE: &str = "active";

#[derive(Debug, Clone)]
pub struct AdminSession<P: KeyValueStore, S: KeyValueStore> {
    passwords: P,
    sessions: S,
}

impl<P: KeyValueStore, S: KeyValueStore> AdminSession<P, S> {
    /// `passwords` is durable storage, `sessions` lives for the browser tab.
    pub fn new(passwords: P, sessions: S) -> Self {
        AdminSession { passwords, sessions }
    }

    pub fn check_existing_session(&self) -> bool {
        let active = self.sessions.get(ADMIN_SESSION_STORAGE_KEY).as_deref() == Some(SESSION_ACTIVE);
        if active {
            info!("Resuming admin session");
        }
        active
    }

    pub fn unlock(&self, password: &str) -> bool {
        let expected = self
            .passwords
            .get(ADMIN_PASSWORD_STORAGE_KEY)
            .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.to_string());
        if password != expected {
            warn!("Admin access denied");
            return false;
        }
        if let Err(e) = self.sessions.set(ADMIN_SESSION_STORAGE_KEY, SESSION_ACTIVE) {
            warn!("Could not record admin session: {}", e);
        }
        true
    }

    pub fn lock(&self) {
        if let Err(e) = self.sessions.remove(ADMIN_SESSION_STORAGE_KEY) {
            warn!("Could not clear admin session: {}", e);
        }
    }

    /// Requires an unlocked session.
    pub fn change_password(&self, new_password: &str) -> Result<bool, StorageError> {
        if !self.check_existing_session() || new_password.trim().is_empty() {
            return Ok(false);
        }
        self.passwords.set(ADMIN_PASSWORD_STORAGE_KEY, new_password)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn default_password_unlocks_and_session_persists() {
        let sessions = MemoryStore::new();
        let admin = AdminSession::new(MemoryStore::new(), sessions.clone());
        assert!(!admin.check_existing_session());
        assert!(!admin.unlock("wrong"));
        assert!(admin.unlock("secret"));

        let reopened = AdminSession::new(MemoryStore::new(), sessions);
        assert!(reopened.check_existing_session());
        reopened.lock();
        assert!(!reopened.check_existing_session());
    }

    #[test]
    fn changed_password_replaces_default() {
        let admin = AdminSession::new(MemoryStore::new(), MemoryStore::new());
        assert_eq!(admin.change_password("hunter2"), Ok(false));
        assert!(admin.unlock("secret"));
        assert_eq!(admin.change_password("hunter2"), Ok(true));
        admin.lock();
        assert!(!admin.unlock("secret"));
        assert!(admin.unlock("hunter2"));
    }
}
