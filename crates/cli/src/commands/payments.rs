//! Payment recording and voiding commands.

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::{Args, Subcommand};
use rust_decimal::Decimal;

use utang_core::types::{NewPayment, Payment};

use super::AppContext;

/// Arguments for the payments command.
#[derive(Args, Debug)]
pub struct PaymentsArgs {
    #[command(subcommand)]
    command: PaymentsCommand,
}

#[derive(Subcommand, Debug)]
enum PaymentsCommand {
    /// List payments
    List {
        /// Only payments against this contract
        #[arg(long)]
        contract: Option<i64>,
    },
    /// Record a payment against a contract
    Add {
        /// Contract being paid down
        #[arg(long)]
        contract: i64,
        /// Amount paid
        #[arg(long)]
        amount: Decimal,
        /// Day the payment was made (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Receipt reference
        #[arg(long)]
        receipt: Option<String>,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// Void a payment, restoring the contract's balance
    Remove {
        /// Payment id
        id: i64,
    },
}

/// Runs the payments command.
///
/// # Errors
/// Returns an error if the gateway call fails.
pub async fn run_payments(ctx: &AppContext, args: PaymentsArgs) -> Result<()> {
    match args.command {
        PaymentsCommand::List { contract } => {
            ctx.store.initialize().await;
            if let Some(message) = ctx.store.last_error().await {
                anyhow::bail!("failed to load payments: {message}");
            }
            let payments = match contract {
                Some(id) => ctx.store.payments_by_contract(id).await,
                None => ctx.store.payments().await,
            };
            print!("{}", render_payments(&payments));
        }
        PaymentsCommand::Add {
            contract,
            amount,
            date,
            receipt,
            notes,
        } => {
            let paid_on = date.unwrap_or_else(|| Utc::now().date_naive());
            let mut new = NewPayment::new(contract, amount, paid_on);
            if let Some(receipt) = receipt {
                new = new.with_receipt_number(receipt);
            }
            if let Some(notes) = notes {
                new = new.with_notes(notes);
            }

            let created = ctx.store.add_payment(&new).await?;
            let balance = ctx
                .store
                .contracts()
                .await
                .iter()
                .find(|c| c.id == contract)
                .map(|c| c.remaining_balance.to_string())
                .unwrap_or_else(|| "?".to_string());
            println!(
                "recorded payment {} of {} on contract {}; balance now {}",
                created.id, created.amount, contract, balance
            );
        }
        PaymentsCommand::Remove { id } => {
            ctx.store.delete_payment(id).await?;
            println!("voided payment {id}");
        }
    }
    Ok(())
}

/// Renders payments as a plain table.
fn render_payments(payments: &[Payment]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<6} {:<10} {:<24} {:>12} {:<12} {}\n",
        "ID", "CONTRACT", "BORROWER", "AMOUNT", "DATE", "RECEIPT"
    ));
    for p in payments {
        out.push_str(&format!(
            "{:<6} {:<10} {:<24} {:>12} {:<12} {}\n",
            p.id, p.contract_id, p.borrower_full_name, p.amount, p.payment_date, p.receipt_number
        ));
    }
    let received: Decimal = payments.iter().map(|p| p.amount).sum();
    out.push_str(&format!(
        "total: {} payments, {} received\n",
        payments.len(),
        received
    ));
    out
}
