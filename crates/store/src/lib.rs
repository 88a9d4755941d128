//! Session-scoped ledger state for the utang client.
//!
//! [`LedgerStore`] owns the in-memory mirror of every collection for the
//! lifetime of the app and keeps it consistent with whichever backend the
//! gateway talks to. [`SessionStore`] persists the operator's role selection
//! between runs.

pub mod session;
pub mod store;

pub use session::{SessionStore, CURRENT_USER_KEY};
pub use store::LedgerStore;
