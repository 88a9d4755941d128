//! The in-memory ledger mirror.
//!
//! One [`LedgerStore`] is constructed at startup around a gateway and is the
//! only owner of the session's entity collections. Mutations go to the
//! gateway first; on success the mirror is patched in place (append, replace
//! by id, remove by id) so readers see the change without a full refetch.
//! Payment mutations are the exception: the backend owns balance movement,
//! so after mirroring the payment the contracts collection is re-fetched
//! wholesale rather than recomputed here.
//!
//! Error policy: read paths record the failure for display and swallow it;
//! write paths record it and hand it back to the caller.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::RwLock;
use tracing::{debug, error};

use utang_core::error::{GatewayError, Result};
use utang_core::gateway::LedgerGateway;
use utang_core::types::{
    Borrower, BorrowerUpdate, Contract, ContractUpdate, CurrentUser, NewBorrower, NewContract,
    NewOffer, NewPayment, Offer, OfferUpdate, Payment, UserRole,
};

use crate::session::SessionStore;

/// Everything the session holds in memory.
#[derive(Debug, Default)]
struct LedgerState {
    current_user: Option<CurrentUser>,
    borrowers: Vec<Borrower>,
    contracts: Vec<Contract>,
    payments: Vec<Payment>,
    offers: Vec<Offer>,
    last_error: Option<String>,
    initialized: bool,
}

/// Decrements the in-flight counter when an operation ends, on every exit
/// path.
struct OpGuard {
    in_flight: Arc<AtomicUsize>,
}

impl OpGuard {
    fn begin(in_flight: &Arc<AtomicUsize>) -> Self {
        in_flight.fetch_add(1, Ordering::SeqCst);
        Self {
            in_flight: Arc::clone(in_flight),
        }
    }
}

impl Drop for OpGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Session-wide aggregate of ledger state.
///
/// `is_loading` reports whether any operation is in flight: the counter
/// behind it only returns to zero when the last overlapping operation
/// finishes.
pub struct LedgerStore {
    gateway: Arc<dyn LedgerGateway>,
    session: SessionStore,
    state: RwLock<LedgerState>,
    in_flight: Arc<AtomicUsize>,
}

impl std::fmt::Debug for LedgerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerStore")
            .field("in_flight", &self.in_flight.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl LedgerStore {
    /// Creates a store over a gateway and session persistence.
    #[must_use]
    pub fn new(gateway: Arc<dyn LedgerGateway>, session: SessionStore) -> Self {
        Self {
            gateway,
            session,
            state: RwLock::new(LedgerState::default()),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Restores the persisted role selection and loads every collection.
    ///
    /// Idempotent: after the first call this is a no-op, so every screen can
    /// call it without re-fetching.
    pub async fn initialize(&self) {
        if self.state.read().await.initialized {
            return;
        }

        let restored = self.session.load();
        {
            let mut state = self.state.write().await;
            state.current_user = restored;
        }

        self.fetch_all().await;
        self.state.write().await.initialized = true;
    }

    // ==================== Fetching ====================

    /// Refreshes all four collections from the gateway together.
    ///
    /// The four fetches run concurrently; one failure discards the whole
    /// batch, so the mirror either moves to the new snapshot as a unit or
    /// keeps what it had. Failures are recorded for display, not returned.
    /// Starting a refresh clears the recorded error, so a successful one
    /// leaves nothing on display.
    pub async fn fetch_all(&self) {
        let _guard = OpGuard::begin(&self.in_flight);
        self.state.write().await.last_error = None;

        let result = tokio::try_join!(
            self.gateway.list_borrowers(),
            self.gateway.list_contracts(None),
            self.gateway.list_payments(None),
            self.gateway.list_offers(None),
        );

        match result {
            Ok((borrowers, contracts, payments, offers)) => {
                let mut state = self.state.write().await;
                state.borrowers = borrowers;
                state.contracts = contracts;
                state.payments = payments;
                state.offers = offers;
                debug!(
                    borrowers = state.borrowers.len(),
                    contracts = state.contracts.len(),
                    payments = state.payments.len(),
                    offers = state.offers.len(),
                    "refreshed ledger mirror"
                );
            }
            Err(err) => self.record_error("fetch_all", &err).await,
        }
    }

    /// Refreshes the borrowers collection alone.
    pub async fn fetch_borrowers(&self) {
        let _guard = OpGuard::begin(&self.in_flight);
        self.state.write().await.last_error = None;
        match self.gateway.list_borrowers().await {
            Ok(borrowers) => self.state.write().await.borrowers = borrowers,
            Err(err) => self.record_error("fetch_borrowers", &err).await,
        }
    }

    /// Refreshes the contracts collection alone.
    pub async fn fetch_contracts(&self) {
        let _guard = OpGuard::begin(&self.in_flight);
        self.state.write().await.last_error = None;
        match self.gateway.list_contracts(None).await {
            Ok(contracts) => self.state.write().await.contracts = contracts,
            Err(err) => self.record_error("fetch_contracts", &err).await,
        }
    }

    /// Refreshes the payments collection alone.
    pub async fn fetch_payments(&self) {
        let _guard = OpGuard::begin(&self.in_flight);
        self.state.write().await.last_error = None;
        match self.gateway.list_payments(None).await {
            Ok(payments) => self.state.write().await.payments = payments,
            Err(err) => self.record_error("fetch_payments", &err).await,
        }
    }

    /// Refreshes the offers collection alone.
    pub async fn fetch_offers(&self) {
        let _guard = OpGuard::begin(&self.in_flight);
        self.state.write().await.last_error = None;
        match self.gateway.list_offers(None).await {
            Ok(offers) => self.state.write().await.offers = offers,
            Err(err) => self.record_error("fetch_offers", &err).await,
        }
    }

    // ==================== Borrowers ====================

    /// Registers a borrower and appends it to the mirror.
    pub async fn add_borrower(&self, new: &NewBorrower) -> Result<Borrower> {
        let _guard = OpGuard::begin(&self.in_flight);
        match self.gateway.create_borrower(new).await {
            Ok(borrower) => {
                self.state.write().await.borrowers.push(borrower.clone());
                Ok(borrower)
            }
            Err(err) => Err(self.record_write_error("add_borrower", err).await),
        }
    }

    /// Updates a borrower and replaces it in the mirror by id.
    pub async fn update_borrower(&self, id: i64, update: &BorrowerUpdate) -> Result<Borrower> {
        let _guard = OpGuard::begin(&self.in_flight);
        match self.gateway.update_borrower(id, update).await {
            Ok(borrower) => {
                let mut state = self.state.write().await;
                if let Some(slot) = state.borrowers.iter_mut().find(|b| b.id == id) {
                    *slot = borrower.clone();
                }
                Ok(borrower)
            }
            Err(err) => Err(self.record_write_error("update_borrower", err).await),
        }
    }

    /// Deletes a borrower and removes it from the mirror.
    pub async fn delete_borrower(&self, id: i64) -> Result<()> {
        let _guard = OpGuard::begin(&self.in_flight);
        match self.gateway.delete_borrower(id).await {
            Ok(()) => {
                self.state.write().await.borrowers.retain(|b| b.id != id);
                Ok(())
            }
            Err(err) => Err(self.record_write_error("delete_borrower", err).await),
        }
    }

    // ==================== Contracts ====================

    /// Opens a contract and appends it to the mirror.
    pub async fn add_contract(&self, new: &NewContract) -> Result<Contract> {
        let _guard = OpGuard::begin(&self.in_flight);
        match self.gateway.create_contract(new).await {
            Ok(contract) => {
                self.state.write().await.contracts.push(contract.clone());
                Ok(contract)
            }
            Err(err) => Err(self.record_write_error("add_contract", err).await),
        }
    }

    /// Updates a contract and replaces it in the mirror by id.
    pub async fn update_contract(&self, id: i64, update: &ContractUpdate) -> Result<Contract> {
        let _guard = OpGuard::begin(&self.in_flight);
        match self.gateway.update_contract(id, update).await {
            Ok(contract) => {
                let mut state = self.state.write().await;
                if let Some(slot) = state.contracts.iter_mut().find(|c| c.id == id) {
                    *slot = contract.clone();
                }
                Ok(contract)
            }
            Err(err) => Err(self.record_write_error("update_contract", err).await),
        }
    }

    /// Deletes a contract, removing it and its payments from the mirror.
    ///
    /// The backend cascades its own persisted payments; the mirror applies
    /// the same cascade locally so no orphaned payments linger until the
    /// next refresh.
    pub async fn delete_contract(&self, id: i64) -> Result<()> {
        let _guard = OpGuard::begin(&self.in_flight);
        match self.gateway.delete_contract(id).await {
            Ok(()) => {
                let mut state = self.state.write().await;
                state.contracts.retain(|c| c.id != id);
                state.payments.retain(|p| p.contract_id != id);
                Ok(())
            }
            Err(err) => Err(self.record_write_error("delete_contract", err).await),
        }
    }

    // ==================== Payments ====================

    /// Records a payment, then re-fetches contracts for the moved balance.
    ///
    /// The backend owns the balance recomputation, so the contracts
    /// collection is replaced wholesale instead of patched.
    pub async fn add_payment(&self, new: &NewPayment) -> Result<Payment> {
        let _guard = OpGuard::begin(&self.in_flight);
        let payment = match self.gateway.create_payment(new).await {
            Ok(payment) => payment,
            Err(err) => return Err(self.record_write_error("add_payment", err).await),
        };
        self.state.write().await.payments.push(payment.clone());

        match self.gateway.list_contracts(None).await {
            Ok(contracts) => {
                self.state.write().await.contracts = contracts;
                Ok(payment)
            }
            Err(err) => Err(self.record_write_error("add_payment refetch", err).await),
        }
    }

    /// Voids a payment, then re-fetches contracts for the restored balance.
    pub async fn delete_payment(&self, id: i64) -> Result<()> {
        let _guard = OpGuard::begin(&self.in_flight);
        if let Err(err) = self.gateway.delete_payment(id).await {
            return Err(self.record_write_error("delete_payment", err).await);
        }
        self.state.write().await.payments.retain(|p| p.id != id);

        match self.gateway.list_contracts(None).await {
            Ok(contracts) => {
                self.state.write().await.contracts = contracts;
                Ok(())
            }
            Err(err) => Err(self.record_write_error("delete_payment refetch", err).await),
        }
    }

    // ==================== Offers ====================

    /// Extends an offer and appends it to the mirror.
    pub async fn add_offer(&self, new: &NewOffer) -> Result<Offer> {
        let _guard = OpGuard::begin(&self.in_flight);
        match self.gateway.create_offer(new).await {
            Ok(offer) => {
                self.state.write().await.offers.push(offer.clone());
                Ok(offer)
            }
            Err(err) => Err(self.record_write_error("add_offer", err).await),
        }
    }

    /// Updates an offer and replaces it in the mirror by id.
    pub async fn update_offer(&self, id: i64, update: &OfferUpdate) -> Result<Offer> {
        let _guard = OpGuard::begin(&self.in_flight);
        match self.gateway.update_offer(id, update).await {
            Ok(offer) => {
                let mut state = self.state.write().await;
                if let Some(slot) = state.offers.iter_mut().find(|o| o.id == id) {
                    *slot = offer.clone();
                }
                Ok(offer)
            }
            Err(err) => Err(self.record_write_error("update_offer", err).await),
        }
    }

    /// Deletes an offer and removes it from the mirror.
    pub async fn delete_offer(&self, id: i64) -> Result<()> {
        let _guard = OpGuard::begin(&self.in_flight);
        match self.gateway.delete_offer(id).await {
            Ok(()) => {
                self.state.write().await.offers.retain(|o| o.id != id);
                Ok(())
            }
            Err(err) => Err(self.record_write_error("delete_offer", err).await),
        }
    }

    // ==================== Current User ====================

    /// Persists a role selection and applies it in memory. No gateway call.
    pub async fn set_current_user(&self, role: UserRole, borrower_id: Option<i64>) -> Result<()> {
        let user = match role {
            UserRole::Financier => CurrentUser::financier(),
            UserRole::Borrower => CurrentUser {
                role,
                borrower_id,
            },
        };
        self.session.save(&user)?;
        self.state.write().await.current_user = Some(user);
        Ok(())
    }

    /// Removes the role selection from storage and memory.
    pub async fn clear_current_user(&self) -> Result<()> {
        self.session.clear()?;
        self.state.write().await.current_user = None;
        Ok(())
    }

    // ==================== Snapshots ====================

    /// Current role selection.
    pub async fn current_user(&self) -> Option<CurrentUser> {
        self.state.read().await.current_user.clone()
    }

    /// Snapshot of the borrowers collection.
    pub async fn borrowers(&self) -> Vec<Borrower> {
        self.state.read().await.borrowers.clone()
    }

    /// Snapshot of the contracts collection.
    pub async fn contracts(&self) -> Vec<Contract> {
        self.state.read().await.contracts.clone()
    }

    /// Snapshot of the payments collection.
    pub async fn payments(&self) -> Vec<Payment> {
        self.state.read().await.payments.clone()
    }

    /// Snapshot of the offers collection.
    pub async fn offers(&self) -> Vec<Offer> {
        self.state.read().await.offers.clone()
    }

    /// True while any operation is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Message of the most recent failure, for display.
    pub async fn last_error(&self) -> Option<String> {
        self.state.read().await.last_error.clone()
    }

    /// True once [`initialize`](Self::initialize) has completed.
    pub async fn is_initialized(&self) -> bool {
        self.state.read().await.initialized
    }

    // ==================== Derived Views ====================

    /// Contracts belonging to one borrower.
    pub async fn contracts_by_borrower(&self, borrower_id: i64) -> Vec<Contract> {
        self.state
            .read()
            .await
            .contracts
            .iter()
            .filter(|c| c.borrower_id == borrower_id)
            .cloned()
            .collect()
    }

    /// Payments recorded against one contract.
    pub async fn payments_by_contract(&self, contract_id: i64) -> Vec<Payment> {
        self.state
            .read()
            .await
            .payments
            .iter()
            .filter(|p| p.contract_id == contract_id)
            .cloned()
            .collect()
    }

    /// Offers extended to one borrower.
    pub async fn offers_by_borrower(&self, borrower_id: i64) -> Vec<Offer> {
        self.state
            .read()
            .await
            .offers
            .iter()
            .filter(|o| o.borrower_id == borrower_id)
            .cloned()
            .collect()
    }

    /// Sum of every contract's principal.
    pub async fn total_lent_amount(&self) -> Decimal {
        self.state
            .read()
            .await
            .contracts
            .iter()
            .map(|c| c.principal_amount)
            .sum()
    }

    /// Sum of every contract's outstanding balance.
    pub async fn total_outstanding(&self) -> Decimal {
        self.state
            .read()
            .await
            .contracts
            .iter()
            .map(|c| c.remaining_balance)
            .sum()
    }

    /// Contracts still accruing installments.
    pub async fn active_contracts(&self) -> Vec<Contract> {
        self.state
            .read()
            .await
            .contracts
            .iter()
            .filter(|c| c.is_active())
            .cloned()
            .collect()
    }

    // ==================== Errors ====================

    /// Records a read-path failure for display.
    async fn record_error(&self, op: &str, err: &GatewayError) {
        error!(op, error = %err, "ledger read failed");
        self.state.write().await.last_error = Some(err.to_string());
    }

    /// Records a write-path failure and hands it back for propagation.
    async fn record_write_error(&self, op: &str, err: GatewayError) -> GatewayError {
        error!(op, error = %err, "ledger write failed");
        self.state.write().await.last_error = Some(err.to_string());
        err
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;
    use std::sync::atomic::AtomicBool;
    use tempfile::TempDir;
    use tokio::sync::Notify;
    use utang_core::storage::ClientStorage;
    use utang_core::types::{ContractStatus, DashboardSummary, InterestMode, TermType};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn borrower(id: i64) -> Borrower {
        Borrower {
            id,
            first_name: "Ana".to_string(),
            last_name: "Cruz".to_string(),
            full_name: "Ana Cruz".to_string(),
            birth_date: date(1992, 6, 1),
            email: String::new(),
            phone: "0917-555-0100".to_string(),
            address: String::new(),
            emergency_contact_name: String::new(),
            emergency_contact_phone: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn contract(id: i64, borrower_id: i64) -> Contract {
        Contract {
            id,
            borrower_id,
            borrower_full_name: "Ana Cruz".to_string(),
            principal_amount: dec!(1000),
            interest_rate: dec!(10),
            interest_mode: InterestMode::Simple,
            term_type: TermType::Monthly,
            term_count: 5,
            liquidation_rate: dec!(0),
            total_amount: dec!(1100),
            remaining_balance: dec!(1100),
            amount_per_term: dec!(220),
            start_date: date(2025, 1, 15),
            due_date: date(2025, 6, 15),
            status: ContractStatus::Active,
            notes: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn payment(id: i64, contract_id: i64) -> Payment {
        Payment {
            id,
            contract_id,
            borrower_full_name: "Ana Cruz".to_string(),
            amount: dec!(220),
            payment_date: date(2025, 2, 15),
            receipt_number: String::new(),
            notes: String::new(),
            created_at: Utc::now(),
        }
    }

    /// Gateway with canned collections, switchable failures, and an optional
    /// gate the first borrower fetch waits on.
    #[derive(Default)]
    struct CannedGateway {
        borrowers: Vec<Borrower>,
        contracts: Vec<Contract>,
        payments: Vec<Payment>,
        offers: Vec<Offer>,
        fail_payments_list: AtomicBool,
        fail_contract_refetch: AtomicBool,
        gate: Option<Arc<Notify>>,
    }

    #[async_trait]
    impl LedgerGateway for CannedGateway {
        async fn list_borrowers(&self) -> Result<Vec<Borrower>> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            Ok(self.borrowers.clone())
        }
        async fn get_borrower(&self, _id: i64) -> Result<Borrower> {
            unimplemented!("not exercised")
        }
        async fn create_borrower(&self, new: &NewBorrower) -> Result<Borrower> {
            let mut created = borrower(99);
            created.first_name = new.first_name.clone();
            created.last_name = new.last_name.clone();
            created.full_name = new.full_name();
            Ok(created)
        }
        async fn update_borrower(&self, id: i64, _update: &BorrowerUpdate) -> Result<Borrower> {
            if self.borrowers.iter().any(|b| b.id == id) {
                let mut updated = borrower(id);
                updated.phone = "updated".to_string();
                Ok(updated)
            } else {
                Err(GatewayError::not_found(format!("borrower {id}")))
            }
        }
        async fn delete_borrower(&self, _id: i64) -> Result<()> {
            Ok(())
        }

        async fn list_contracts(&self, _borrower_id: Option<i64>) -> Result<Vec<Contract>> {
            if self.fail_contract_refetch.load(Ordering::SeqCst) {
                return Err(GatewayError::Network("contracts unreachable".to_string()));
            }
            Ok(self.contracts.clone())
        }
        async fn get_contract(&self, _id: i64) -> Result<Contract> {
            unimplemented!("not exercised")
        }
        async fn create_contract(&self, _new: &NewContract) -> Result<Contract> {
            unimplemented!("not exercised")
        }
        async fn update_contract(&self, _id: i64, _update: &ContractUpdate) -> Result<Contract> {
            unimplemented!("not exercised")
        }
        async fn delete_contract(&self, _id: i64) -> Result<()> {
            Ok(())
        }

        async fn list_payments(&self, _contract_id: Option<i64>) -> Result<Vec<Payment>> {
            if self.fail_payments_list.load(Ordering::SeqCst) {
                return Err(GatewayError::api(500, "payments exploded"));
            }
            Ok(self.payments.clone())
        }
        async fn get_payment(&self, _id: i64) -> Result<Payment> {
            unimplemented!("not exercised")
        }
        async fn create_payment(&self, new: &NewPayment) -> Result<Payment> {
            Ok(payment(77, new.contract_id))
        }
        async fn delete_payment(&self, _id: i64) -> Result<()> {
            Ok(())
        }

        async fn list_offers(&self, _borrower_id: Option<i64>) -> Result<Vec<Offer>> {
            Ok(self.offers.clone())
        }
        async fn get_offer(&self, _id: i64) -> Result<Offer> {
            unimplemented!("not exercised")
        }
        async fn create_offer(&self, _new: &NewOffer) -> Result<Offer> {
            unimplemented!("not exercised")
        }
        async fn update_offer(&self, _id: i64, _update: &OfferUpdate) -> Result<Offer> {
            unimplemented!("not exercised")
        }
        async fn delete_offer(&self, _id: i64) -> Result<()> {
            Ok(())
        }

        async fn dashboard_summary(&self) -> Result<DashboardSummary> {
            unimplemented!("not exercised")
        }
    }

    fn store_over(gateway: CannedGateway) -> (TempDir, LedgerStore) {
        let dir = TempDir::new().unwrap();
        let session = SessionStore::new(ClientStorage::new(dir.path()));
        let store = LedgerStore::new(Arc::new(gateway), session);
        (dir, store)
    }

    // ==================== Fetch Tests ====================

    #[tokio::test]
    async fn test_fetch_all_commits_every_collection() {
        let gateway = CannedGateway {
            borrowers: vec![borrower(1)],
            contracts: vec![contract(10, 1)],
            payments: vec![payment(100, 10)],
            ..CannedGateway::default()
        };
        let (_dir, store) = store_over(gateway);

        store.fetch_all().await;

        assert_eq!(store.borrowers().await.len(), 1);
        assert_eq!(store.contracts().await.len(), 1);
        assert_eq!(store.payments().await.len(), 1);
        assert!(store.offers().await.is_empty());
        assert_eq!(store.last_error().await, None);
    }

    #[tokio::test]
    async fn test_fetch_all_is_all_or_nothing() {
        let gateway = CannedGateway {
            borrowers: vec![borrower(1)],
            contracts: vec![contract(10, 1)],
            payments: vec![payment(100, 10)],
            ..CannedGateway::default()
        };
        gateway.fail_payments_list.store(true, Ordering::SeqCst);
        let (_dir, store) = store_over(gateway);

        store.fetch_all().await;

        // One failed fetch keeps the other three results out of the mirror.
        assert!(store.borrowers().await.is_empty());
        assert!(store.contracts().await.is_empty());
        assert!(store.payments().await.is_empty());
        let message = store.last_error().await.unwrap();
        assert!(message.contains("payments exploded"));
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_previous_snapshot() {
        let gateway = Arc::new(CannedGateway {
            borrowers: vec![borrower(1)],
            contracts: vec![contract(10, 1)],
            ..CannedGateway::default()
        });
        let dir = TempDir::new().unwrap();
        let session = SessionStore::new(ClientStorage::new(dir.path()));
        let store = LedgerStore::new(Arc::clone(&gateway) as Arc<dyn LedgerGateway>, session);

        store.fetch_all().await;
        assert_eq!(store.contracts().await.len(), 1);

        // Same store, now with a failing fetch: old snapshot survives.
        gateway.fail_payments_list.store(true, Ordering::SeqCst);
        store.fetch_all().await;
        assert_eq!(store.contracts().await.len(), 1);
        assert_eq!(store.borrowers().await.len(), 1);
    }

    #[tokio::test]
    async fn test_successful_refresh_clears_recorded_error() {
        let gateway = Arc::new(CannedGateway {
            borrowers: vec![borrower(1)],
            ..CannedGateway::default()
        });
        let dir = TempDir::new().unwrap();
        let session = SessionStore::new(ClientStorage::new(dir.path()));
        let store = LedgerStore::new(Arc::clone(&gateway) as Arc<dyn LedgerGateway>, session);

        gateway.fail_payments_list.store(true, Ordering::SeqCst);
        store.fetch_all().await;
        assert!(store.last_error().await.is_some());

        // The outage ends; the next refresh leaves nothing on display.
        gateway.fail_payments_list.store(false, Ordering::SeqCst);
        store.fetch_all().await;
        assert_eq!(store.last_error().await, None);
        assert_eq!(store.borrowers().await.len(), 1);
    }

    #[tokio::test]
    async fn test_per_collection_refresh_clears_recorded_error() {
        let gateway = Arc::new(CannedGateway::default());
        let dir = TempDir::new().unwrap();
        let session = SessionStore::new(ClientStorage::new(dir.path()));
        let store = LedgerStore::new(Arc::clone(&gateway) as Arc<dyn LedgerGateway>, session);

        gateway.fail_payments_list.store(true, Ordering::SeqCst);
        store.fetch_payments().await;
        assert!(store.last_error().await.is_some());

        gateway.fail_payments_list.store(false, Ordering::SeqCst);
        store.fetch_payments().await;
        assert_eq!(store.last_error().await, None);
    }

    #[tokio::test]
    async fn test_is_loading_tracks_overlapping_operations() {
        let gate = Arc::new(Notify::new());
        let gateway = CannedGateway {
            gate: Some(Arc::clone(&gate)),
            ..CannedGateway::default()
        };
        let (_dir, store) = store_over(gateway);
        let store = Arc::new(store);

        assert!(!store.is_loading());

        let fetching = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.fetch_all().await })
        };

        // The borrower fetch is parked on the gate, so the operation counts
        // as in flight.
        tokio::task::yield_now().await;
        assert!(store.is_loading());

        gate.notify_one();
        fetching.await.unwrap();
        assert!(!store.is_loading());
    }

    // ==================== Mirror Tests ====================

    #[tokio::test]
    async fn test_add_borrower_appends_to_mirror() {
        let (_dir, store) = store_over(CannedGateway::default());

        let created = store
            .add_borrower(&NewBorrower::new("Ana", "Cruz", date(1992, 6, 1), "0917"))
            .await
            .unwrap();

        let mirrored = store.borrowers().await;
        assert_eq!(mirrored.len(), 1);
        assert_eq!(mirrored[0].id, created.id);
    }

    #[tokio::test]
    async fn test_update_unknown_id_leaves_mirror_unchanged() {
        let gateway = CannedGateway {
            borrowers: vec![borrower(1)],
            ..CannedGateway::default()
        };
        let (_dir, store) = store_over(gateway);
        store.fetch_all().await;

        // Gateway accepts the update, but id 1 is the only mirrored record;
        // a stale mirror missing the id is a silent no-op.
        store
            .update_borrower(1, &BorrowerUpdate::default())
            .await
            .unwrap();
        assert_eq!(store.borrowers().await[0].phone, "updated");
    }

    #[tokio::test]
    async fn test_delete_contract_cascades_mirrored_payments() {
        let gateway = CannedGateway {
            borrowers: vec![borrower(1)],
            contracts: vec![contract(10, 1), contract(11, 1)],
            payments: vec![payment(100, 10), payment(101, 10), payment(102, 11)],
            ..CannedGateway::default()
        };
        let (_dir, store) = store_over(gateway);
        store.fetch_all().await;

        store.delete_contract(10).await.unwrap();

        let contracts = store.contracts().await;
        assert_eq!(contracts.len(), 1);
        assert_eq!(contracts[0].id, 11);

        let payments = store.payments().await;
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].id, 102);

        // Other collections untouched.
        assert_eq!(store.borrowers().await.len(), 1);
    }

    #[tokio::test]
    async fn test_add_payment_refetches_contracts_wholesale() {
        let mut settled = contract(10, 1);
        settled.remaining_balance = dec!(880);
        let gateway = CannedGateway {
            borrowers: vec![borrower(1)],
            contracts: vec![settled],
            ..CannedGateway::default()
        };
        let (_dir, store) = store_over(gateway);

        store
            .add_payment(&NewPayment::new(10, dec!(220), date(2025, 2, 15)))
            .await
            .unwrap();

        assert_eq!(store.payments().await.len(), 1);
        // Balance came from the backend's contracts snapshot, not local math.
        assert_eq!(store.contracts().await[0].remaining_balance, dec!(880));
    }

    #[tokio::test]
    async fn test_failed_payment_refetch_propagates() {
        let gateway = CannedGateway::default();
        gateway.fail_contract_refetch.store(true, Ordering::SeqCst);
        let (_dir, store) = store_over(gateway);

        let err = store
            .add_payment(&NewPayment::new(10, dec!(220), date(2025, 2, 15)))
            .await
            .unwrap_err();

        assert!(matches!(err, GatewayError::Network(_)));
        assert!(store.last_error().await.is_some());
        // The payment itself went through and stays mirrored.
        assert_eq!(store.payments().await.len(), 1);
    }

    // ==================== Current User Tests ====================

    #[tokio::test]
    async fn test_set_current_user_persists_and_applies() {
        let dir = TempDir::new().unwrap();
        let session = SessionStore::new(ClientStorage::new(dir.path()));
        let store = LedgerStore::new(Arc::new(CannedGateway::default()), session.clone());

        store
            .set_current_user(UserRole::Borrower, Some(7))
            .await
            .unwrap();

        assert_eq!(store.current_user().await, Some(CurrentUser::borrower(7)));
        // Visible to a fresh session store over the same storage.
        assert_eq!(session.load(), Some(CurrentUser::borrower(7)));

        store.clear_current_user().await.unwrap();
        assert_eq!(store.current_user().await, None);
        assert_eq!(session.load(), None);
    }

    #[tokio::test]
    async fn test_initialize_restores_selection_and_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let session = SessionStore::new(ClientStorage::new(dir.path()));
        session.save(&CurrentUser::financier()).unwrap();

        let gateway = CannedGateway {
            borrowers: vec![borrower(1)],
            ..CannedGateway::default()
        };
        let store = LedgerStore::new(Arc::new(gateway), session);

        store.initialize().await;
        assert!(store.is_initialized().await);
        assert_eq!(store.current_user().await, Some(CurrentUser::financier()));
        assert_eq!(store.borrowers().await.len(), 1);

        // Second call is a no-op even after the mirror is emptied.
        store.clear_current_user().await.unwrap();
        store.initialize().await;
        assert_eq!(store.current_user().await, None);
    }

    // ==================== Derived View Tests ====================

    #[tokio::test]
    async fn test_derived_views() {
        let mut completed = contract(11, 2);
        completed.remaining_balance = dec!(0);
        completed.status = ContractStatus::Completed;
        completed.principal_amount = dec!(500);

        let gateway = CannedGateway {
            borrowers: vec![borrower(1), borrower(2)],
            contracts: vec![contract(10, 1), completed],
            payments: vec![payment(100, 10), payment(101, 11)],
            ..CannedGateway::default()
        };
        let (_dir, store) = store_over(gateway);
        store.fetch_all().await;

        assert_eq!(store.contracts_by_borrower(1).await.len(), 1);
        assert_eq!(store.payments_by_contract(10).await.len(), 1);
        assert!(store.offers_by_borrower(1).await.is_empty());
        assert_eq!(store.total_lent_amount().await, dec!(1500));
        assert_eq!(store.total_outstanding().await, dec!(1100));

        let active = store.active_contracts().await;
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, 10);
    }
}
