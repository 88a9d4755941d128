//! Bearer-token handling for ledger API requests.
//!
//! The token lives in durable storage under a fixed key and is read back on
//! every request, so a token set by one process is picked up by the next
//! without restarting anything. No token simply means unauthenticated
//! requests; the backend decides what those may do.

use tracing::warn;
use utang_core::error::Result;
use utang_core::storage::ClientStorage;

/// Storage key the bearer token lives under.
pub const AUTH_TOKEN_KEY: &str = "auth_token";

/// Durable bearer-token store.
#[derive(Debug, Clone)]
pub struct TokenStore {
    storage: ClientStorage,
}

impl TokenStore {
    /// Creates a token store over the given storage.
    #[must_use]
    pub fn new(storage: ClientStorage) -> Self {
        Self { storage }
    }

    /// Reads the current token.
    ///
    /// Returns `None` when no token is stored or the stored document is
    /// unreadable; an unreadable token degrades to unauthenticated requests
    /// rather than failing the call that needed it.
    #[must_use]
    pub fn token(&self) -> Option<String> {
        match self.storage.get::<String>(AUTH_TOKEN_KEY) {
            Ok(token) => token,
            Err(err) => {
                warn!(error = %err, "stored auth token unreadable, proceeding unauthenticated");
                None
            }
        }
    }

    /// Stores a token, replacing any previous one.
    pub fn set_token(&self, token: &str) -> Result<()> {
        self.storage.set(AUTH_TOKEN_KEY, &token)
    }

    /// Removes the stored token. Clearing an absent token is not an error.
    pub fn clear(&self) -> Result<()> {
        self.storage.remove(AUTH_TOKEN_KEY)
    }

    /// Returns true if a token document exists.
    #[must_use]
    pub fn has_token(&self) -> bool {
        self.storage.contains(AUTH_TOKEN_KEY)
    }
}
