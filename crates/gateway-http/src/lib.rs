//! Remote REST backend for the utang lending ledger.
//!
//! Implements [`utang_core::LedgerGateway`] over the ledger's JSON API.
//! The bearer token travels with every request when one is stored on the
//! device; failed responses are classified into the shared error taxonomy.

pub mod auth;
pub mod client;

pub use auth::{TokenStore, AUTH_TOKEN_KEY};
pub use client::{HttpGateway, HttpGatewayConfig, DEFAULT_BASE_URL};
