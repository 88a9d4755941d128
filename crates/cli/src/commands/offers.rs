//! Offer management commands.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use rust_decimal::Decimal;

use utang_core::types::{NewOffer, Offer, OfferStatus, OfferUpdate};

use super::AppContext;

/// Arguments for the offers command.
#[derive(Args, Debug)]
pub struct OffersArgs {
    #[command(subcommand)]
    command: OffersCommand,
}

#[derive(Subcommand, Debug)]
enum OffersCommand {
    /// List offers
    List {
        /// Only offers extended to this borrower
        #[arg(long)]
        borrower: Option<i64>,
    },
    /// Extend an offer to a borrower
    Add {
        /// Borrower to extend the offer to
        #[arg(long)]
        borrower: i64,
        /// Amount offered
        #[arg(long)]
        amount: Decimal,
        /// Interest rate in percent
        #[arg(long)]
        rate: Decimal,
        /// Term length in months
        #[arg(long)]
        months: u32,
        /// Day the offer lapses (YYYY-MM-DD)
        #[arg(long)]
        expires: NaiveDate,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// Record a decision on an offer
    SetStatus {
        /// Offer id
        id: i64,
        /// New status (pending, accepted, rejected, or expired)
        #[arg(long)]
        status: OfferStatus,
    },
    /// Remove an offer
    Remove {
        /// Offer id
        id: i64,
    },
}

/// Runs the offers command.
///
/// # Errors
/// Returns an error if the gateway call fails.
pub async fn run_offers(ctx: &AppContext, args: OffersArgs) -> Result<()> {
    match args.command {
        OffersCommand::List { borrower } => {
            ctx.store.initialize().await;
            if let Some(message) = ctx.store.last_error().await {
                anyhow::bail!("failed to load offers: {message}");
            }
            let offers = match borrower {
                Some(id) => ctx.store.offers_by_borrower(id).await,
                None => ctx.store.offers().await,
            };
            print!("{}", render_offers(&offers));
        }
        OffersCommand::Add {
            borrower,
            amount,
            rate,
            months,
            expires,
            notes,
        } => {
            let mut new = NewOffer::new(borrower, amount, rate, months, expires);
            if let Some(notes) = notes {
                new = new.with_notes(notes);
            }

            let created = ctx.store.add_offer(&new).await?;
            println!(
                "extended offer {} of {} to {} (expires {})",
                created.id, created.offered_amount, created.borrower_full_name, created.expiry_date
            );
        }
        OffersCommand::SetStatus { id, status } => {
            let update = OfferUpdate {
                status: Some(status),
                notes: None,
            };
            let updated = ctx.store.update_offer(id, &update).await?;
            println!("offer {} is now {}", updated.id, updated.status);
        }
        OffersCommand::Remove { id } => {
            ctx.store.delete_offer(id).await?;
            println!("removed offer {id}");
        }
    }
    Ok(())
}

/// Renders offers as a plain table.
fn render_offers(offers: &[Offer]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<6} {:<24} {:>12} {:>7} {:>7} {:<10} {:<12}\n",
        "ID", "BORROWER", "AMOUNT", "RATE", "MONTHS", "STATUS", "EXPIRES"
    ));
    for o in offers {
        out.push_str(&format!(
            "{:<6} {:<24} {:>12} {:>7} {:>7} {:<10} {:<12}\n",
            o.id,
            o.borrower_full_name,
            o.offered_amount,
            o.interest_rate,
            o.term_months,
            o.status,
            o.expiry_date
        ));
    }
    out.push_str(&format!("total: {}\n", offers.len()));
    out
}
