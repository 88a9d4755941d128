//! Contract management commands.

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::{Args, Subcommand};
use rust_decimal::Decimal;

use utang_core::types::{Contract, InterestMode, NewContract, TermType};

use super::AppContext;

/// Arguments for the contracts command.
#[derive(Args, Debug)]
pub struct ContractsArgs {
    #[command(subcommand)]
    command: ContractsCommand,
}

#[derive(Subcommand, Debug)]
enum ContractsCommand {
    /// List contracts
    List {
        /// Only contracts belonging to this borrower
        #[arg(long)]
        borrower: Option<i64>,
    },
    /// Open a contract
    Add {
        /// Borrower receiving the loan
        #[arg(long)]
        borrower: i64,
        /// Principal amount
        #[arg(long)]
        principal: Decimal,
        /// Interest rate in percent
        #[arg(long)]
        rate: Decimal,
        /// Interest mode (simple or compound)
        #[arg(long, default_value = "simple")]
        mode: InterestMode,
        /// Repayment cadence (daily, weekly, or monthly)
        #[arg(long, default_value = "monthly")]
        term_type: TermType,
        /// Number of installments
        #[arg(long)]
        terms: u32,
        /// Liquidation penalty rate in percent
        #[arg(long)]
        liquidation_rate: Option<Decimal>,
        /// First day of the contract (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        start_date: Option<NaiveDate>,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// Remove a contract and its payments
    Remove {
        /// Contract id
        id: i64,
    },
}

/// Runs the contracts command.
///
/// # Errors
/// Returns an error if the gateway call fails.
pub async fn run_contracts(ctx: &AppContext, args: ContractsArgs) -> Result<()> {
    match args.command {
        ContractsCommand::List { borrower } => {
            ctx.store.initialize().await;
            if let Some(message) = ctx.store.last_error().await {
                anyhow::bail!("failed to load contracts: {message}");
            }
            let contracts = match borrower {
                Some(id) => ctx.store.contracts_by_borrower(id).await,
                None => ctx.store.contracts().await,
            };
            print!("{}", render_contracts(&contracts));
        }
        ContractsCommand::Add {
            borrower,
            principal,
            rate,
            mode,
            term_type,
            terms,
            liquidation_rate,
            start_date,
            notes,
        } => {
            let start = start_date.unwrap_or_else(|| Utc::now().date_naive());
            let mut new = NewContract::new(borrower, principal, rate, mode, term_type, terms, start);
            if let Some(rate) = liquidation_rate {
                new = new.with_liquidation_rate(rate);
            }
            if let Some(notes) = notes {
                new = new.with_notes(notes);
            }

            let created = ctx.store.add_contract(&new).await?;
            println!(
                "opened contract {} for {}: total {}, {} per {} term, due {}",
                created.id,
                created.borrower_full_name,
                created.total_amount,
                created.amount_per_term,
                created.term_type,
                created.due_date
            );
        }
        ContractsCommand::Remove { id } => {
            ctx.store.delete_contract(id).await?;
            println!("removed contract {id} and its payments");
        }
    }
    Ok(())
}

/// Renders contracts as a plain table.
fn render_contracts(contracts: &[Contract]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<6} {:<24} {:>12} {:>12} {:>12} {:<10} {:<12}\n",
        "ID", "BORROWER", "PRINCIPAL", "TOTAL", "BALANCE", "STATUS", "DUE"
    ));
    for c in contracts {
        out.push_str(&format!(
            "{:<6} {:<24} {:>12} {:>12} {:>12} {:<10} {:<12}\n",
            c.id,
            c.borrower_full_name,
            c.principal_amount,
            c.total_amount,
            c.remaining_balance,
            c.status,
            c.due_date
        ));
    }
    let outstanding: Decimal = contracts.iter().map(|c| c.remaining_balance).sum();
    out.push_str(&format!(
        "total: {} contracts, {} outstanding\n",
        contracts.len(),
        outstanding
    ));
    out
}
