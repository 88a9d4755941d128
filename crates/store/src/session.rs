//! Persistence of the operator's role selection.
//!
//! The selection lives in durable storage under a fixed key so the app
//! reopens as the same role. Loading is tolerant: a corrupt document reads
//! as "no selection" with a warning, matching how little is at stake.

use tracing::warn;

use utang_core::error::Result;
use utang_core::storage::ClientStorage;
use utang_core::types::CurrentUser;

/// Storage key the role selection lives under.
pub const CURRENT_USER_KEY: &str = "current_user";

/// Durable store for the session's [`CurrentUser`].
#[derive(Debug, Clone)]
pub struct SessionStore {
    storage: ClientStorage,
}

impl SessionStore {
    /// Creates a session store over the given storage.
    #[must_use]
    pub fn new(storage: ClientStorage) -> Self {
        Self { storage }
    }

    /// Reads the persisted selection.
    ///
    /// Returns `None` when nothing is persisted or the document is
    /// unreadable; a broken selection document means starting unselected,
    /// not failing startup.
    #[must_use]
    pub fn load(&self) -> Option<CurrentUser> {
        match self.storage.get::<CurrentUser>(CURRENT_USER_KEY) {
            Ok(user) => user,
            Err(err) => {
                warn!(error = %err, "persisted role selection unreadable, ignoring it");
                None
            }
        }
    }

    /// Persists a selection, replacing any previous one.
    pub fn save(&self, user: &CurrentUser) -> Result<()> {
        self.storage.set(CURRENT_USER_KEY, user)
    }

    /// Removes the persisted selection. Clearing an absent selection is not
    /// an error.
    pub fn clear(&self) -> Result<()> {
        self.storage.remove(CURRENT_USER_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn session_store() -> (TempDir, SessionStore) {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::new(ClientStorage::new(dir.path()));
        (dir, store)
    }

    #[test]
    fn test_save_then_load_selection() {
        let (_dir, store) = session_store();

        store.save(&CurrentUser::borrower(7)).unwrap();
        assert_eq!(store.load(), Some(CurrentUser::borrower(7)));
    }

    #[test]
    fn test_load_without_selection_is_none() {
        let (_dir, store) = session_store();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_corrupt_selection_reads_as_none() {
        let (dir, store) = session_store();
        let mut file = File::create(dir.path().join("current_user.json")).unwrap();
        file.write_all(b"{\"role\": \"emperor\"}").unwrap();

        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_clear_removes_selection() {
        let (_dir, store) = session_store();
        store.save(&CurrentUser::financier()).unwrap();

        store.clear().unwrap();
        assert_eq!(store.load(), None);
        // Clearing again is fine.
        store.clear().unwrap();
    }
}
