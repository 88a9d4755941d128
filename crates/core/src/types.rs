//! Data models for the utang lending ledger.
//!
//! All monetary values use `rust_decimal::Decimal` for precision and
//! serialize as plain JSON numbers, matching the ledger API wire format.
//! Field names follow the API's camelCase convention.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Enums
// =============================================================================

/// Lifecycle state of a lending contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContractStatus {
    /// Contract has an outstanding balance.
    Active,
    /// Contract was paid down to zero.
    Completed,
    /// Contract passed its due date with a balance remaining.
    Overdue,
}

impl ContractStatus {
    /// Returns the API string representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Overdue => "overdue",
        }
    }
}

/// Lifecycle state of a loan offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OfferStatus {
    /// Offer is awaiting a decision.
    Pending,
    /// Offer was accepted by the financier.
    Accepted,
    /// Offer was rejected.
    Rejected,
    /// Offer lapsed past its expiry date.
    Expired,
}

impl OfferStatus {
    /// Returns the API string representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Expired => "expired",
        }
    }
}

/// Repayment cadence of a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermType {
    /// One installment per day.
    Daily,
    /// One installment per week.
    Weekly,
    /// One installment per month.
    Monthly,
}

impl TermType {
    /// Returns the API string representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

/// How interest on a contract is computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterestMode {
    /// Flat interest on the principal.
    Simple,
    /// Interest compounded over a single period.
    Compound,
}

impl InterestMode {
    /// Returns the API string representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Compound => "compound",
        }
    }
}

/// Role the device operator is acting as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Lends money and manages the ledger.
    Financier,
    /// Views their own contracts and offers.
    Borrower,
}

impl UserRole {
    /// Returns the API string representation.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Financier => "financier",
            Self::Borrower => "borrower",
        }
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContractStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "overdue" => Ok(Self::Overdue),
            other => Err(format!(
                "unknown contract status: '{other}' (expected active, completed, or overdue)"
            )),
        }
    }
}

impl fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OfferStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            "expired" => Ok(Self::Expired),
            other => Err(format!(
                "unknown offer status: '{other}' (expected pending, accepted, rejected, or expired)"
            )),
        }
    }
}

impl fmt::Display for TermType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TermType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(format!(
                "unknown term type: '{other}' (expected daily, weekly, or monthly)"
            )),
        }
    }
}

impl fmt::Display for InterestMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterestMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(Self::Simple),
            "compound" => Ok(Self::Compound),
            other => Err(format!(
                "unknown interest mode: '{other}' (expected simple or compound)"
            )),
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "financier" => Ok(Self::Financier),
            "borrower" => Ok(Self::Borrower),
            other => Err(format!(
                "unknown user role: '{other}' (expected financier or borrower)"
            )),
        }
    }
}

// =============================================================================
// Borrower Types
// =============================================================================

/// A registered borrower.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Borrower {
    /// Backend-assigned identifier.
    pub id: i64,

    /// Given name.
    pub first_name: String,

    /// Family name.
    pub last_name: String,

    /// Denormalized display name maintained by the backend.
    pub full_name: String,

    /// Date of birth.
    pub birth_date: NaiveDate,

    /// Contact email (empty string when not provided).
    pub email: String,

    /// Contact phone number.
    pub phone: String,

    /// Home address (empty string when not provided).
    pub address: String,

    /// Emergency contact name.
    pub emergency_contact_name: String,

    /// Emergency contact phone.
    pub emergency_contact_phone: String,

    /// Record creation time.
    pub created_at: DateTime<Utc>,

    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Borrower {
    /// Recomputes the denormalized display name from the name parts.
    pub fn refresh_full_name(&mut self) {
        self.full_name = format!("{} {}", self.first_name, self.last_name);
    }
}

/// Request body for registering a borrower.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBorrower {
    /// Given name.
    pub first_name: String,

    /// Family name.
    pub last_name: String,

    /// Date of birth.
    pub birth_date: NaiveDate,

    /// Contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Contact phone number.
    pub phone: String,

    /// Home address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Emergency contact name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact_name: Option<String>,

    /// Emergency contact phone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact_phone: Option<String>,
}

impl NewBorrower {
    /// Creates a registration request with the required fields.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        birth_date: NaiveDate,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            birth_date,
            email: None,
            phone: phone.into(),
            address: None,
            emergency_contact_name: None,
            emergency_contact_phone: None,
        }
    }

    /// Sets the contact email.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Sets the home address.
    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Sets the emergency contact.
    #[must_use]
    pub fn with_emergency_contact(
        mut self,
        name: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        self.emergency_contact_name = Some(name.into());
        self.emergency_contact_phone = Some(phone.into());
        self
    }

    /// Display name the backend will derive for this borrower.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Partial update for a borrower. `None` fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowerUpdate {
    /// New given name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    /// New family name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    /// New date of birth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,

    /// New contact email.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// New contact phone number.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// New home address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// New emergency contact name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact_name: Option<String>,

    /// New emergency contact phone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_contact_phone: Option<String>,
}

// =============================================================================
// Contract Types
// =============================================================================

/// An active or settled lending contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    /// Backend-assigned identifier.
    pub id: i64,

    /// Borrower this contract belongs to.
    pub borrower_id: i64,

    /// Denormalized borrower display name.
    pub borrower_full_name: String,

    /// Amount lent out.
    #[serde(with = "rust_decimal::serde::float")]
    pub principal_amount: Decimal,

    /// Interest rate in percent (e.g. 10 for 10%).
    #[serde(with = "rust_decimal::serde::float")]
    pub interest_rate: Decimal,

    /// Interest computation mode.
    pub interest_mode: InterestMode,

    /// Repayment cadence.
    pub term_type: TermType,

    /// Number of installments.
    pub term_count: u32,

    /// Penalty rate applied on liquidation, in percent.
    #[serde(with = "rust_decimal::serde::float")]
    pub liquidation_rate: Decimal,

    /// Total amount payable, fixed at creation.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,

    /// Outstanding balance. Never negative, never above `total_amount`.
    #[serde(with = "rust_decimal::serde::float")]
    pub remaining_balance: Decimal,

    /// Installment size, fixed at creation.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount_per_term: Decimal,

    /// First day of the contract.
    pub start_date: NaiveDate,

    /// Day the final installment is due.
    pub due_date: NaiveDate,

    /// Lifecycle state.
    pub status: ContractStatus,

    /// Free-form notes (empty string when not provided).
    pub notes: String,

    /// Record creation time.
    pub created_at: DateTime<Utc>,

    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

impl Contract {
    /// Returns true if the contract still accrues installments.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == ContractStatus::Active
    }

    /// Reduces the balance by a payment amount, clamping at zero.
    ///
    /// A contract whose balance reaches zero flips to [`ContractStatus::Completed`].
    pub fn apply_payment(&mut self, amount: Decimal) {
        self.remaining_balance = (self.remaining_balance - amount).max(Decimal::ZERO);
        if self.remaining_balance.is_zero() {
            self.status = ContractStatus::Completed;
        }
    }

    /// Restores the balance after a payment is voided, clamping at the
    /// contract total.
    ///
    /// A completed contract reopens as [`ContractStatus::Active`] when the
    /// restored balance is positive.
    pub fn reverse_payment(&mut self, amount: Decimal) {
        self.remaining_balance = (self.remaining_balance + amount).min(self.total_amount);
        if self.status == ContractStatus::Completed && self.remaining_balance > Decimal::ZERO {
            self.status = ContractStatus::Active;
        }
    }
}

/// Request body for opening a contract.
///
/// The backend derives `totalAmount`, `amountPerTerm`, and `dueDate` from
/// these fields; clients never send derived values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContract {
    /// Borrower receiving the loan.
    pub borrower_id: i64,

    /// Amount to lend.
    #[serde(with = "rust_decimal::serde::float")]
    pub principal_amount: Decimal,

    /// Interest rate in percent.
    #[serde(with = "rust_decimal::serde::float")]
    pub interest_rate: Decimal,

    /// Interest computation mode.
    pub interest_mode: InterestMode,

    /// Repayment cadence.
    pub term_type: TermType,

    /// Number of installments.
    pub term_count: u32,

    /// Penalty rate applied on liquidation, in percent.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub liquidation_rate: Option<Decimal>,

    /// First day of the contract.
    pub start_date: NaiveDate,

    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewContract {
    /// Creates a contract request with the required fields.
    pub fn new(
        borrower_id: i64,
        principal_amount: Decimal,
        interest_rate: Decimal,
        interest_mode: InterestMode,
        term_type: TermType,
        term_count: u32,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            borrower_id,
            principal_amount,
            interest_rate,
            interest_mode,
            term_type,
            term_count,
            liquidation_rate: None,
            start_date,
            notes: None,
        }
    }

    /// Sets the liquidation penalty rate.
    #[must_use]
    pub fn with_liquidation_rate(mut self, rate: Decimal) -> Self {
        self.liquidation_rate = Some(rate);
        self
    }

    /// Attaches notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Partial update for a contract. `None` fields are left unchanged.
///
/// Changing principal or rate does not recompute the derived totals; those
/// are fixed when the contract is created.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractUpdate {
    /// New principal amount.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub principal_amount: Option<Decimal>,

    /// New interest rate in percent.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub interest_rate: Option<Decimal>,

    /// New interest mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_mode: Option<InterestMode>,

    /// New repayment cadence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_type: Option<TermType>,

    /// New installment count.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub term_count: Option<u32>,

    /// New liquidation penalty rate.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub liquidation_rate: Option<Decimal>,

    /// New start date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,

    /// New lifecycle state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ContractStatus>,

    /// New notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// =============================================================================
// Payment Types
// =============================================================================

/// A recorded repayment against a contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Backend-assigned identifier.
    pub id: i64,

    /// Contract this payment settles against.
    pub contract_id: i64,

    /// Denormalized borrower display name.
    pub borrower_full_name: String,

    /// Amount paid.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,

    /// Day the payment was made.
    pub payment_date: NaiveDate,

    /// Receipt reference (empty string when not provided).
    pub receipt_number: String,

    /// Free-form notes (empty string when not provided).
    pub notes: String,

    /// Record creation time.
    pub created_at: DateTime<Utc>,
}

/// Request body for recording a payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    /// Contract being paid down.
    pub contract_id: i64,

    /// Amount paid.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,

    /// Day the payment was made.
    pub payment_date: NaiveDate,

    /// Receipt reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt_number: Option<String>,

    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewPayment {
    /// Creates a payment request with the required fields.
    pub fn new(contract_id: i64, amount: Decimal, payment_date: NaiveDate) -> Self {
        Self {
            contract_id,
            amount,
            payment_date,
            receipt_number: None,
            notes: None,
        }
    }

    /// Sets the receipt reference.
    #[must_use]
    pub fn with_receipt_number(mut self, receipt: impl Into<String>) -> Self {
        self.receipt_number = Some(receipt.into());
        self
    }

    /// Attaches notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

// =============================================================================
// Offer Types
// =============================================================================

/// A loan offer extended to a borrower.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Offer {
    /// Backend-assigned identifier.
    pub id: i64,

    /// Borrower the offer is extended to.
    pub borrower_id: i64,

    /// Denormalized borrower display name.
    pub borrower_full_name: String,

    /// Amount offered.
    #[serde(with = "rust_decimal::serde::float")]
    pub offered_amount: Decimal,

    /// Interest rate in percent.
    #[serde(with = "rust_decimal::serde::float")]
    pub interest_rate: Decimal,

    /// Offered term length in months.
    pub term_months: u32,

    /// Day the offer was extended.
    pub offer_date: NaiveDate,

    /// Day the offer lapses.
    pub expiry_date: NaiveDate,

    /// Lifecycle state.
    pub status: OfferStatus,

    /// Free-form notes (empty string when not provided).
    pub notes: String,

    /// Record creation time.
    pub created_at: DateTime<Utc>,

    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// Request body for extending an offer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOffer {
    /// Borrower to extend the offer to.
    pub borrower_id: i64,

    /// Amount offered.
    #[serde(with = "rust_decimal::serde::float")]
    pub offered_amount: Decimal,

    /// Interest rate in percent.
    #[serde(with = "rust_decimal::serde::float")]
    pub interest_rate: Decimal,

    /// Offered term length in months.
    pub term_months: u32,

    /// Day the offer lapses.
    pub expiry_date: NaiveDate,

    /// Free-form notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewOffer {
    /// Creates an offer request with the required fields.
    pub fn new(
        borrower_id: i64,
        offered_amount: Decimal,
        interest_rate: Decimal,
        term_months: u32,
        expiry_date: NaiveDate,
    ) -> Self {
        Self {
            borrower_id,
            offered_amount,
            interest_rate,
            term_months,
            expiry_date,
            notes: None,
        }
    }

    /// Attaches notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Partial update for an offer. Only the decision and notes can change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferUpdate {
    /// New lifecycle state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<OfferStatus>,

    /// New notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// =============================================================================
// Dashboard Types
// =============================================================================

/// Aggregate portfolio figures computed by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Registered borrowers.
    pub total_borrowers: u64,

    /// Contracts ever opened.
    pub total_contracts: u64,

    /// Sum of all principals.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_lent_amount: Decimal,

    /// Sum of all outstanding balances.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_outstanding_balance: Decimal,

    /// Sum of all payments received.
    #[serde(with = "rust_decimal::serde::float")]
    pub total_payments_received: Decimal,

    /// Contracts currently active.
    pub active_contracts: u64,

    /// Contracts past due with a balance remaining.
    pub overdue_contracts: u64,
}

// =============================================================================
// Session Types
// =============================================================================

/// The role selection persisted on this device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    /// Role the operator is acting as.
    pub role: UserRole,

    /// Borrower identity, when acting as a borrower.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub borrower_id: Option<i64>,
}

impl CurrentUser {
    /// Creates a financier session.
    #[must_use]
    pub fn financier() -> Self {
        Self {
            role: UserRole::Financier,
            borrower_id: None,
        }
    }

    /// Creates a borrower session bound to a borrower record.
    #[must_use]
    pub fn borrower(borrower_id: i64) -> Self {
        Self {
            role: UserRole::Borrower,
            borrower_id: Some(borrower_id),
        }
    }
}
