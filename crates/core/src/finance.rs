//! Loan math for lending contracts.
//!
//! These functions mirror the backend's derivations exactly so that
//! locally-created contracts carry the same figures a remote backend would
//! return. All amounts use `rust_decimal::Decimal`.

use chrono::{Days, Months, NaiveDate};
use rust_decimal::Decimal;

use crate::types::{InterestMode, TermType};

/// Total amount payable on a loan.
///
/// Simple interest adds a flat `principal * rate / 100` on top of the
/// principal. Compound interest is applied over a single period, so it
/// yields the same figure; the two modes diverge only if the backend ever
/// grows multi-period compounding.
#[must_use]
pub fn total_amount(principal: Decimal, interest_rate: Decimal, mode: InterestMode) -> Decimal {
    match mode {
        InterestMode::Simple => principal + (principal * interest_rate) / Decimal::ONE_HUNDRED,
        InterestMode::Compound => {
            principal * (Decimal::ONE + interest_rate / Decimal::ONE_HUNDRED)
        }
    }
}

/// Installment size for a contract: the total split evenly across terms.
///
/// A zero term count yields zero rather than dividing by zero.
#[must_use]
pub fn amount_per_term(total_amount: Decimal, term_count: u32) -> Decimal {
    if term_count == 0 {
        return Decimal::ZERO;
    }
    total_amount / Decimal::from(term_count)
}

/// Day the final installment falls due.
///
/// Daily and weekly cadences advance by exact day counts; monthly cadence
/// advances by calendar months, clamping to the last day of shorter months.
/// Date overflow falls back to the start date.
#[must_use]
pub fn due_date(start_date: NaiveDate, term_type: TermType, term_count: u32) -> NaiveDate {
    let advanced = match term_type {
        TermType::Daily => start_date.checked_add_days(Days::new(u64::from(term_count))),
        TermType::Weekly => start_date.checked_add_days(Days::new(u64::from(term_count) * 7)),
        TermType::Monthly => start_date.checked_add_months(Months::new(term_count)),
    };
    advanced.unwrap_or(start_date)
}
