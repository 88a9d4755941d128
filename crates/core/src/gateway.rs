//! The gateway contract every ledger backend implements.
//!
//! Consumers hold a `dyn LedgerGateway` and never learn whether records
//! come from the remote REST API or from on-device documents; backend
//! selection happens once, at startup, from configuration.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    Borrower, BorrowerUpdate, Contract, ContractUpdate, DashboardSummary, NewBorrower,
    NewContract, NewOffer, NewPayment, Offer, OfferUpdate, Payment,
};

/// CRUD access to the lending ledger.
///
/// Writes return the stored record so callers can mirror backend-assigned
/// ids and derived fields without a follow-up fetch. Deletes return nothing;
/// payments additionally move their contract's balance, which callers
/// re-fetch rather than recompute.
#[async_trait]
pub trait LedgerGateway: Send + Sync {
    // ==================== Borrowers ====================

    /// Lists every registered borrower.
    async fn list_borrowers(&self) -> Result<Vec<Borrower>>;

    /// Fetches one borrower by id.
    async fn get_borrower(&self, id: i64) -> Result<Borrower>;

    /// Registers a borrower and returns the stored record.
    async fn create_borrower(&self, new: &NewBorrower) -> Result<Borrower>;

    /// Applies a partial update and returns the stored record.
    async fn update_borrower(&self, id: i64, update: &BorrowerUpdate) -> Result<Borrower>;

    /// Removes a borrower.
    async fn delete_borrower(&self, id: i64) -> Result<()>;

    // ==================== Contracts ====================

    /// Lists contracts, optionally only those belonging to one borrower.
    async fn list_contracts(&self, borrower_id: Option<i64>) -> Result<Vec<Contract>>;

    /// Fetches one contract by id.
    async fn get_contract(&self, id: i64) -> Result<Contract>;

    /// Opens a contract. The backend derives the total, installment size,
    /// and due date.
    async fn create_contract(&self, new: &NewContract) -> Result<Contract>;

    /// Applies a partial update and returns the stored record.
    async fn update_contract(&self, id: i64, update: &ContractUpdate) -> Result<Contract>;

    /// Removes a contract and its payments.
    async fn delete_contract(&self, id: i64) -> Result<()>;

    // ==================== Payments ====================

    /// Lists payments, optionally only those against one contract.
    async fn list_payments(&self, contract_id: Option<i64>) -> Result<Vec<Payment>>;

    /// Fetches one payment by id.
    async fn get_payment(&self, id: i64) -> Result<Payment>;

    /// Records a payment. The backend reduces the contract's balance.
    async fn create_payment(&self, new: &NewPayment) -> Result<Payment>;

    /// Voids a payment. The backend restores the contract's balance.
    async fn delete_payment(&self, id: i64) -> Result<()>;

    // ==================== Offers ====================

    /// Lists offers, optionally only those extended to one borrower.
    async fn list_offers(&self, borrower_id: Option<i64>) -> Result<Vec<Offer>>;

    /// Fetches one offer by id.
    async fn get_offer(&self, id: i64) -> Result<Offer>;

    /// Extends an offer and returns the stored record.
    async fn create_offer(&self, new: &NewOffer) -> Result<Offer>;

    /// Applies a decision or note change and returns the stored record.
    async fn update_offer(&self, id: i64, update: &OfferUpdate) -> Result<Offer>;

    /// Removes an offer.
    async fn delete_offer(&self, id: i64) -> Result<()>;

    // ==================== Dashboard ====================

    /// Fetches aggregate portfolio figures.
    async fn dashboard_summary(&self) -> Result<DashboardSummary>;
}
