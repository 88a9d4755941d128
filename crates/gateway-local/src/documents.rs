//! Collection documents for the local ledger backend.
//!
//! Each collection persists as one JSON document in [`ClientStorage`] under
//! a fixed key. Loads are tolerant: a missing or unreadable document comes
//! back as an empty collection with a warning, never an error, so a corrupt
//! file cannot brick the ledger. Saves go through storage unchanged and do
//! surface errors.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use utang_core::error::Result;
use utang_core::storage::ClientStorage;
use utang_core::types::{Borrower, Contract, Offer, Payment};

/// Storage key for the borrowers collection.
pub const BORROWERS_KEY: &str = "borrowers";

/// Storage key for the contracts collection.
pub const CONTRACTS_KEY: &str = "contracts";

/// Storage key for the payments collection.
pub const PAYMENTS_KEY: &str = "payments";

/// Storage key for the offers collection.
pub const OFFERS_KEY: &str = "offers";

/// Typed access to the four collection documents.
#[derive(Debug, Clone)]
pub struct Documents {
    storage: ClientStorage,
}

impl Documents {
    /// Creates document access over the given storage.
    #[must_use]
    pub fn new(storage: ClientStorage) -> Self {
        Self { storage }
    }

    /// Loads a collection, treating missing or unreadable documents as empty.
    fn load<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        match self.storage.get::<Vec<T>>(key) {
            Ok(Some(items)) => items,
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(key, error = %err, "collection document unreadable, starting empty");
                Vec::new()
            }
        }
    }

    /// Persists a collection, replacing the previous document.
    fn save<T: Serialize>(&self, key: &str, items: &[T]) -> Result<()> {
        self.storage.set(key, &items)
    }

    /// Loads all borrowers.
    #[must_use]
    pub fn borrowers(&self) -> Vec<Borrower> {
        self.load(BORROWERS_KEY)
    }

    /// Persists the borrowers collection.
    pub fn save_borrowers(&self, items: &[Borrower]) -> Result<()> {
        self.save(BORROWERS_KEY, items)
    }

    /// Loads all contracts.
    #[must_use]
    pub fn contracts(&self) -> Vec<Contract> {
        self.load(CONTRACTS_KEY)
    }

    /// Persists the contracts collection.
    pub fn save_contracts(&self, items: &[Contract]) -> Result<()> {
        self.save(CONTRACTS_KEY, items)
    }

    /// Loads all payments.
    #[must_use]
    pub fn payments(&self) -> Vec<Payment> {
        self.load(PAYMENTS_KEY)
    }

    /// Persists the payments collection.
    pub fn save_payments(&self, items: &[Payment]) -> Result<()> {
        self.save(PAYMENTS_KEY, items)
    }

    /// Loads all offers.
    #[must_use]
    pub fn offers(&self) -> Vec<Offer> {
        self.load(OFFERS_KEY)
    }

    /// Persists the offers collection.
    pub fn save_offers(&self, items: &[Offer]) -> Result<()> {
        self.save(OFFERS_KEY, items)
    }
}

/// Next id for a collection: one past the highest id in use.
///
/// Ids are never reused while their record exists, and deleting the highest
/// record may release its id; that matches server-style sequences closely
/// enough for a single-device ledger.
pub(crate) fn next_id(ids: impl Iterator<Item = i64>) -> i64 {
    ids.max().unwrap_or(0) + 1
}
