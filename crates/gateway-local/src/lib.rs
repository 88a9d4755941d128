//! On-device backend for the utang lending ledger.
//!
//! Implements [`utang_core::LedgerGateway`] over JSON documents in durable
//! client storage, one document per collection. Balance movements that the
//! remote API computes server-side — payment application and reversal,
//! contract totals at creation — are computed here instead, with the same
//! rules from `utang_core`.

pub mod documents;
pub mod gateway;

pub use documents::{
    Documents, BORROWERS_KEY, CONTRACTS_KEY, OFFERS_KEY, PAYMENTS_KEY,
};
pub use gateway::LocalGateway;
