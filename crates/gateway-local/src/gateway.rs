//! [`LedgerGateway`] implementation over on-device documents.
//!
//! Plays the role the remote backend plays under the HTTP gateway: it
//! assigns ids, stamps audit times, derives contract figures at creation,
//! and moves contract balances when payments are recorded or voided. The
//! store layer above cannot tell the two backends apart.

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;

use utang_core::error::{GatewayError, Result};
use utang_core::finance;
use utang_core::gateway::LedgerGateway;
use utang_core::storage::ClientStorage;
use utang_core::types::{
    Borrower, BorrowerUpdate, Contract, ContractStatus, ContractUpdate, DashboardSummary,
    NewBorrower, NewContract, NewOffer, NewPayment, Offer, OfferStatus, OfferUpdate, Payment,
};

use crate::documents::{next_id, Documents};

/// Gateway backed by JSON documents on the device.
#[derive(Debug, Clone)]
pub struct LocalGateway {
    docs: Documents,
}

impl LocalGateway {
    /// Creates a gateway over the given storage.
    #[must_use]
    pub fn new(storage: ClientStorage) -> Self {
        Self {
            docs: Documents::new(storage),
        }
    }

    /// Looks up a borrower's display name for denormalized fields.
    fn borrower_name(&self, borrower_id: i64) -> Result<String> {
        self.docs
            .borrowers()
            .into_iter()
            .find(|b| b.id == borrower_id)
            .map(|b| b.full_name)
            .ok_or_else(|| GatewayError::not_found(format!("borrower {borrower_id}")))
    }
}

#[async_trait]
impl LedgerGateway for LocalGateway {
    // ==================== Borrowers ====================

    async fn list_borrowers(&self) -> Result<Vec<Borrower>> {
        Ok(self.docs.borrowers())
    }

    async fn get_borrower(&self, id: i64) -> Result<Borrower> {
        self.docs
            .borrowers()
            .into_iter()
            .find(|b| b.id == id)
            .ok_or_else(|| GatewayError::not_found(format!("borrower {id}")))
    }

    async fn create_borrower(&self, new: &NewBorrower) -> Result<Borrower> {
        let mut borrowers = self.docs.borrowers();
        let now = Utc::now();
        let borrower = Borrower {
            id: next_id(borrowers.iter().map(|b| b.id)),
            first_name: new.first_name.clone(),
            last_name: new.last_name.clone(),
            full_name: new.full_name(),
            birth_date: new.birth_date,
            email: new.email.clone().unwrap_or_default(),
            phone: new.phone.clone(),
            address: new.address.clone().unwrap_or_default(),
            emergency_contact_name: new.emergency_contact_name.clone().unwrap_or_default(),
            emergency_contact_phone: new.emergency_contact_phone.clone().unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        borrowers.push(borrower.clone());
        self.docs.save_borrowers(&borrowers)?;
        Ok(borrower)
    }

    async fn update_borrower(&self, id: i64, update: &BorrowerUpdate) -> Result<Borrower> {
        let mut borrowers = self.docs.borrowers();
        let borrower = borrowers
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| GatewayError::not_found(format!("borrower {id}")))?;

        if let Some(first_name) = &update.first_name {
            borrower.first_name = first_name.clone();
        }
        if let Some(last_name) = &update.last_name {
            borrower.last_name = last_name.clone();
        }
        if let Some(birth_date) = update.birth_date {
            borrower.birth_date = birth_date;
        }
        if let Some(email) = &update.email {
            borrower.email = email.clone();
        }
        if let Some(phone) = &update.phone {
            borrower.phone = phone.clone();
        }
        if let Some(address) = &update.address {
            borrower.address = address.clone();
        }
        if let Some(name) = &update.emergency_contact_name {
            borrower.emergency_contact_name = name.clone();
        }
        if let Some(phone) = &update.emergency_contact_phone {
            borrower.emergency_contact_phone = phone.clone();
        }
        borrower.refresh_full_name();
        borrower.updated_at = Utc::now();

        let updated = borrower.clone();
        self.docs.save_borrowers(&borrowers)?;
        Ok(updated)
    }

    async fn delete_borrower(&self, id: i64) -> Result<()> {
        // Refuse while contracts or offers still reference the borrower.
        if self.docs.contracts().iter().any(|c| c.borrower_id == id) {
            return Err(GatewayError::validation(
                422,
                format!("borrower {id} still has contracts"),
                Default::default(),
            ));
        }
        if self.docs.offers().iter().any(|o| o.borrower_id == id) {
            return Err(GatewayError::validation(
                422,
                format!("borrower {id} still has offers"),
                Default::default(),
            ));
        }

        let mut borrowers = self.docs.borrowers();
        borrowers.retain(|b| b.id != id);
        self.docs.save_borrowers(&borrowers)
    }

    // ==================== Contracts ====================

    async fn list_contracts(&self, borrower_id: Option<i64>) -> Result<Vec<Contract>> {
        let contracts = self.docs.contracts();
        Ok(match borrower_id {
            Some(id) => contracts.into_iter().filter(|c| c.borrower_id == id).collect(),
            None => contracts,
        })
    }

    async fn get_contract(&self, id: i64) -> Result<Contract> {
        self.docs
            .contracts()
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| GatewayError::not_found(format!("contract {id}")))
    }

    async fn create_contract(&self, new: &NewContract) -> Result<Contract> {
        let borrower_full_name = self.borrower_name(new.borrower_id)?;
        let total = finance::total_amount(new.principal_amount, new.interest_rate, new.interest_mode);
        let mut contracts = self.docs.contracts();
        let now = Utc::now();
        let contract = Contract {
            id: next_id(contracts.iter().map(|c| c.id)),
            borrower_id: new.borrower_id,
            borrower_full_name,
            principal_amount: new.principal_amount,
            interest_rate: new.interest_rate,
            interest_mode: new.interest_mode,
            term_type: new.term_type,
            term_count: new.term_count,
            liquidation_rate: new.liquidation_rate.unwrap_or(Decimal::ZERO),
            total_amount: total,
            remaining_balance: total,
            amount_per_term: finance::amount_per_term(total, new.term_count),
            start_date: new.start_date,
            due_date: finance::due_date(new.start_date, new.term_type, new.term_count),
            status: ContractStatus::Active,
            notes: new.notes.clone().unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        contracts.push(contract.clone());
        self.docs.save_contracts(&contracts)?;
        Ok(contract)
    }

    async fn update_contract(&self, id: i64, update: &ContractUpdate) -> Result<Contract> {
        let mut contracts = self.docs.contracts();
        let contract = contracts
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| GatewayError::not_found(format!("contract {id}")))?;

        // Derived figures stay fixed at creation even if the inputs change.
        if let Some(principal) = update.principal_amount {
            contract.principal_amount = principal;
        }
        if let Some(rate) = update.interest_rate {
            contract.interest_rate = rate;
        }
        if let Some(mode) = update.interest_mode {
            contract.interest_mode = mode;
        }
        if let Some(term_type) = update.term_type {
            contract.term_type = term_type;
        }
        if let Some(term_count) = update.term_count {
            contract.term_count = term_count;
        }
        if let Some(rate) = update.liquidation_rate {
            contract.liquidation_rate = rate;
        }
        if let Some(start_date) = update.start_date {
            contract.start_date = start_date;
        }
        if let Some(status) = update.status {
            contract.status = status;
        }
        if let Some(notes) = &update.notes {
            contract.notes = notes.clone();
        }
        contract.updated_at = Utc::now();

        let updated = contract.clone();
        self.docs.save_contracts(&contracts)?;
        Ok(updated)
    }

    async fn delete_contract(&self, id: i64) -> Result<()> {
        let mut contracts = self.docs.contracts();
        contracts.retain(|c| c.id != id);
        self.docs.save_contracts(&contracts)?;

        // Cascade: the contract's payments go with it.
        let mut payments = self.docs.payments();
        payments.retain(|p| p.contract_id != id);
        self.docs.save_payments(&payments)
    }

    // ==================== Payments ====================

    async fn list_payments(&self, contract_id: Option<i64>) -> Result<Vec<Payment>> {
        let payments = self.docs.payments();
        Ok(match contract_id {
            Some(id) => payments.into_iter().filter(|p| p.contract_id == id).collect(),
            None => payments,
        })
    }

    async fn get_payment(&self, id: i64) -> Result<Payment> {
        self.docs
            .payments()
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| GatewayError::not_found(format!("payment {id}")))
    }

    async fn create_payment(&self, new: &NewPayment) -> Result<Payment> {
        let mut contracts = self.docs.contracts();
        let contract = contracts
            .iter_mut()
            .find(|c| c.id == new.contract_id)
            .ok_or_else(|| GatewayError::not_found(format!("contract {}", new.contract_id)))?;

        contract.apply_payment(new.amount);
        contract.updated_at = Utc::now();
        let borrower_full_name = contract.borrower_full_name.clone();
        self.docs.save_contracts(&contracts)?;

        let mut payments = self.docs.payments();
        let payment = Payment {
            id: next_id(payments.iter().map(|p| p.id)),
            contract_id: new.contract_id,
            borrower_full_name,
            amount: new.amount,
            payment_date: new.payment_date,
            receipt_number: new.receipt_number.clone().unwrap_or_default(),
            notes: new.notes.clone().unwrap_or_default(),
            created_at: Utc::now(),
        };
        payments.push(payment.clone());
        self.docs.save_payments(&payments)?;
        Ok(payment)
    }

    async fn delete_payment(&self, id: i64) -> Result<()> {
        let mut payments = self.docs.payments();
        let Some(position) = payments.iter().position(|p| p.id == id) else {
            // Unknown id: nothing to void.
            return Ok(());
        };
        let payment = payments.remove(position);

        let mut contracts = self.docs.contracts();
        if let Some(contract) = contracts.iter_mut().find(|c| c.id == payment.contract_id) {
            contract.reverse_payment(payment.amount);
            contract.updated_at = Utc::now();
            self.docs.save_contracts(&contracts)?;
        }
        self.docs.save_payments(&payments)
    }

    // ==================== Offers ====================

    async fn list_offers(&self, borrower_id: Option<i64>) -> Result<Vec<Offer>> {
        let offers = self.docs.offers();
        Ok(match borrower_id {
            Some(id) => offers.into_iter().filter(|o| o.borrower_id == id).collect(),
            None => offers,
        })
    }

    async fn get_offer(&self, id: i64) -> Result<Offer> {
        self.docs
            .offers()
            .into_iter()
            .find(|o| o.id == id)
            .ok_or_else(|| GatewayError::not_found(format!("offer {id}")))
    }

    async fn create_offer(&self, new: &NewOffer) -> Result<Offer> {
        let borrower_full_name = self.borrower_name(new.borrower_id)?;
        let mut offers = self.docs.offers();
        let now = Utc::now();
        let offer = Offer {
            id: next_id(offers.iter().map(|o| o.id)),
            borrower_id: new.borrower_id,
            borrower_full_name,
            offered_amount: new.offered_amount,
            interest_rate: new.interest_rate,
            term_months: new.term_months,
            offer_date: now.date_naive(),
            expiry_date: new.expiry_date,
            status: OfferStatus::Pending,
            notes: new.notes.clone().unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        offers.push(offer.clone());
        self.docs.save_offers(&offers)?;
        Ok(offer)
    }

    async fn update_offer(&self, id: i64, update: &OfferUpdate) -> Result<Offer> {
        let mut offers = self.docs.offers();
        let offer = offers
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| GatewayError::not_found(format!("offer {id}")))?;

        if let Some(status) = update.status {
            offer.status = status;
        }
        if let Some(notes) = &update.notes {
            offer.notes = notes.clone();
        }
        offer.updated_at = Utc::now();

        let updated = offer.clone();
        self.docs.save_offers(&offers)?;
        Ok(updated)
    }

    async fn delete_offer(&self, id: i64) -> Result<()> {
        let mut offers = self.docs.offers();
        offers.retain(|o| o.id != id);
        self.docs.save_offers(&offers)
    }

    // ==================== Dashboard ====================

    async fn dashboard_summary(&self) -> Result<DashboardSummary> {
        let contracts = self.docs.contracts();
        let payments = self.docs.payments();
        Ok(DashboardSummary {
            total_borrowers: self.docs.borrowers().len() as u64,
            total_contracts: contracts.len() as u64,
            total_lent_amount: contracts.iter().map(|c| c.principal_amount).sum(),
            total_outstanding_balance: contracts.iter().map(|c| c.remaining_balance).sum(),
            total_payments_received: payments.iter().map(|p| p.amount).sum(),
            active_contracts: contracts
                .iter()
                .filter(|c| c.status == ContractStatus::Active)
                .count() as u64,
            overdue_contracts: contracts
                .iter()
                .filter(|c| c.status == ContractStatus::Overdue)
                .count() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;
    use utang_core::types::{InterestMode, TermType};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn gateway() -> (TempDir, LocalGateway) {
        let dir = TempDir::new().unwrap();
        let gateway = LocalGateway::new(ClientStorage::new(dir.path()));
        (dir, gateway)
    }

    async fn seed_borrower(gateway: &LocalGateway) -> Borrower {
        gateway
            .create_borrower(&NewBorrower::new(
                "Ana",
                "Cruz",
                date(1992, 6, 1),
                "0917-555-0100",
            ))
            .await
            .unwrap()
    }

    async fn seed_contract(gateway: &LocalGateway, borrower_id: i64) -> Contract {
        gateway
            .create_contract(&NewContract::new(
                borrower_id,
                dec!(1000),
                dec!(10),
                InterestMode::Simple,
                TermType::Monthly,
                5,
                date(2025, 1, 15),
            ))
            .await
            .unwrap()
    }

    // ==================== Borrower Tests ====================

    #[tokio::test]
    async fn test_create_borrower_assigns_sequential_ids() {
        let (_dir, gateway) = gateway();

        let first = seed_borrower(&gateway).await;
        let second = gateway
            .create_borrower(&NewBorrower::new("Juan", "Reyes", date(1988, 2, 2), "0917"))
            .await
            .unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.full_name, "Ana Cruz");
        assert_eq!(gateway.list_borrowers().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_borrower_refreshes_full_name() {
        let (_dir, gateway) = gateway();
        let borrower = seed_borrower(&gateway).await;

        let update = BorrowerUpdate {
            last_name: Some("Reyes".to_string()),
            ..BorrowerUpdate::default()
        };
        let updated = gateway.update_borrower(borrower.id, &update).await.unwrap();

        assert_eq!(updated.full_name, "Ana Reyes");
        // Untouched fields survive.
        assert_eq!(updated.phone, "0917-555-0100");
    }

    #[tokio::test]
    async fn test_update_unknown_borrower_is_not_found() {
        let (_dir, gateway) = gateway();
        let err = gateway
            .update_borrower(404, &BorrowerUpdate::default())
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_borrower_refused_while_contracts_exist() {
        let (_dir, gateway) = gateway();
        let borrower = seed_borrower(&gateway).await;
        seed_contract(&gateway, borrower.id).await;

        let err = gateway.delete_borrower(borrower.id).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(gateway.list_borrowers().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_borrower_without_references_succeeds() {
        let (_dir, gateway) = gateway();
        let borrower = seed_borrower(&gateway).await;

        gateway.delete_borrower(borrower.id).await.unwrap();
        assert!(gateway.list_borrowers().await.unwrap().is_empty());
    }

    // ==================== Contract Tests ====================

    #[tokio::test]
    async fn test_create_contract_derives_figures() {
        let (_dir, gateway) = gateway();
        let borrower = seed_borrower(&gateway).await;

        let contract = seed_contract(&gateway, borrower.id).await;

        assert_eq!(contract.total_amount, dec!(1100));
        assert_eq!(contract.remaining_balance, dec!(1100));
        assert_eq!(contract.amount_per_term, dec!(220));
        assert_eq!(contract.due_date, date(2025, 6, 15));
        assert_eq!(contract.status, ContractStatus::Active);
        assert_eq!(contract.borrower_full_name, "Ana Cruz");
    }

    #[tokio::test]
    async fn test_create_contract_for_unknown_borrower_fails() {
        let (_dir, gateway) = gateway();
        let new = NewContract::new(
            77,
            dec!(500),
            dec!(5),
            InterestMode::Simple,
            TermType::Weekly,
            4,
            date(2025, 3, 1),
        );
        let err = gateway.create_contract(&new).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_update_contract_keeps_derived_figures() {
        let (_dir, gateway) = gateway();
        let borrower = seed_borrower(&gateway).await;
        let contract = seed_contract(&gateway, borrower.id).await;

        let update = ContractUpdate {
            interest_rate: Some(dec!(25)),
            ..ContractUpdate::default()
        };
        let updated = gateway.update_contract(contract.id, &update).await.unwrap();

        assert_eq!(updated.interest_rate, dec!(25));
        // Totals were fixed at creation.
        assert_eq!(updated.total_amount, dec!(1100));
        assert_eq!(updated.amount_per_term, dec!(220));
    }

    #[tokio::test]
    async fn test_delete_contract_cascades_payments() {
        let (_dir, gateway) = gateway();
        let borrower = seed_borrower(&gateway).await;
        let doomed = seed_contract(&gateway, borrower.id).await;
        let kept = seed_contract(&gateway, borrower.id).await;

        gateway
            .create_payment(&NewPayment::new(doomed.id, dec!(100), date(2025, 2, 1)))
            .await
            .unwrap();
        let kept_payment = gateway
            .create_payment(&NewPayment::new(kept.id, dec!(50), date(2025, 2, 1)))
            .await
            .unwrap();

        gateway.delete_contract(doomed.id).await.unwrap();

        let contracts = gateway.list_contracts(None).await.unwrap();
        assert_eq!(contracts.len(), 1);
        assert_eq!(contracts[0].id, kept.id);

        let payments = gateway.list_payments(None).await.unwrap();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].id, kept_payment.id);
    }

    #[tokio::test]
    async fn test_list_contracts_filters_by_borrower() {
        let (_dir, gateway) = gateway();
        let ana = seed_borrower(&gateway).await;
        let juan = gateway
            .create_borrower(&NewBorrower::new("Juan", "Reyes", date(1988, 2, 2), "0917"))
            .await
            .unwrap();
        seed_contract(&gateway, ana.id).await;
        seed_contract(&gateway, juan.id).await;

        let filtered = gateway.list_contracts(Some(juan.id)).await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].borrower_id, juan.id);
    }

    // ==================== Payment Tests ====================

    #[tokio::test]
    async fn test_payment_reduces_contract_balance() {
        let (_dir, gateway) = gateway();
        let borrower = seed_borrower(&gateway).await;
        let contract = seed_contract(&gateway, borrower.id).await;

        gateway
            .create_payment(&NewPayment::new(contract.id, dec!(300), date(2025, 2, 1)))
            .await
            .unwrap();

        let reloaded = gateway.get_contract(contract.id).await.unwrap();
        assert_eq!(reloaded.remaining_balance, dec!(800));
        assert_eq!(reloaded.status, ContractStatus::Active);
    }

    #[tokio::test]
    async fn test_final_payment_completes_contract() {
        let (_dir, gateway) = gateway();
        let borrower = seed_borrower(&gateway).await;
        let contract = seed_contract(&gateway, borrower.id).await;

        gateway
            .create_payment(&NewPayment::new(contract.id, dec!(1100), date(2025, 2, 1)))
            .await
            .unwrap();

        let reloaded = gateway.get_contract(contract.id).await.unwrap();
        assert_eq!(reloaded.remaining_balance, Decimal::ZERO);
        assert_eq!(reloaded.status, ContractStatus::Completed);
    }

    #[tokio::test]
    async fn test_voiding_payment_restores_balance_and_status() {
        let (_dir, gateway) = gateway();
        let borrower = seed_borrower(&gateway).await;
        let contract = seed_contract(&gateway, borrower.id).await;

        gateway
            .create_payment(&NewPayment::new(contract.id, dec!(300), date(2025, 2, 1)))
            .await
            .unwrap();
        let closing = gateway
            .create_payment(&NewPayment::new(contract.id, dec!(800), date(2025, 3, 1)))
            .await
            .unwrap();

        gateway.delete_payment(closing.id).await.unwrap();

        let reloaded = gateway.get_contract(contract.id).await.unwrap();
        assert_eq!(reloaded.remaining_balance, dec!(800));
        assert_eq!(reloaded.status, ContractStatus::Active);
    }

    #[tokio::test]
    async fn test_voiding_unknown_payment_is_noop() {
        let (_dir, gateway) = gateway();
        gateway.delete_payment(999).await.unwrap();
    }

    #[tokio::test]
    async fn test_payment_on_unknown_contract_fails() {
        let (_dir, gateway) = gateway();
        let err = gateway
            .create_payment(&NewPayment::new(404, dec!(10), date(2025, 2, 1)))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    // ==================== Offer Tests ====================

    #[tokio::test]
    async fn test_offer_lifecycle() {
        let (_dir, gateway) = gateway();
        let borrower = seed_borrower(&gateway).await;

        let offer = gateway
            .create_offer(&NewOffer::new(
                borrower.id,
                dec!(5000),
                dec!(8),
                6,
                date(2025, 4, 1),
            ))
            .await
            .unwrap();
        assert_eq!(offer.status, OfferStatus::Pending);
        assert_eq!(offer.borrower_full_name, "Ana Cruz");

        let update = OfferUpdate {
            status: Some(OfferStatus::Accepted),
            notes: None,
        };
        let accepted = gateway.update_offer(offer.id, &update).await.unwrap();
        assert_eq!(accepted.status, OfferStatus::Accepted);

        gateway.delete_offer(offer.id).await.unwrap();
        assert!(gateway.list_offers(None).await.unwrap().is_empty());
    }

    // ==================== Dashboard Tests ====================

    #[tokio::test]
    async fn test_dashboard_summary_aggregates() {
        let (_dir, gateway) = gateway();
        let borrower = seed_borrower(&gateway).await;
        let contract = seed_contract(&gateway, borrower.id).await;
        gateway
            .create_payment(&NewPayment::new(contract.id, dec!(300), date(2025, 2, 1)))
            .await
            .unwrap();

        let summary = gateway.dashboard_summary().await.unwrap();
        assert_eq!(summary.total_borrowers, 1);
        assert_eq!(summary.total_contracts, 1);
        assert_eq!(summary.total_lent_amount, dec!(1000));
        assert_eq!(summary.total_outstanding_balance, dec!(800));
        assert_eq!(summary.total_payments_received, dec!(300));
        assert_eq!(summary.active_contracts, 1);
        assert_eq!(summary.overdue_contracts, 0);
    }

    // ==================== Persistence Tests ====================

    #[tokio::test]
    async fn test_state_survives_reopening_storage() {
        let dir = TempDir::new().unwrap();
        {
            let gateway = LocalGateway::new(ClientStorage::new(dir.path()));
            let borrower = gateway
                .create_borrower(&NewBorrower::new("Ana", "Cruz", date(1992, 6, 1), "0917"))
                .await
                .unwrap();
            gateway
                .create_contract(&NewContract::new(
                    borrower.id,
                    dec!(1000),
                    dec!(10),
                    InterestMode::Simple,
                    TermType::Monthly,
                    5,
                    date(2025, 1, 15),
                ))
                .await
                .unwrap();
        }

        let reopened = LocalGateway::new(ClientStorage::new(dir.path()));
        let contracts = reopened.list_contracts(None).await.unwrap();
        assert_eq!(contracts.len(), 1);
        assert_eq!(contracts[0].total_amount, dec!(1100));
    }
}
