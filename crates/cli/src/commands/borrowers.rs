//! Borrower management commands.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Subcommand};

use utang_core::types::{Borrower, BorrowerUpdate, NewBorrower};

use super::AppContext;

/// Arguments for the borrowers command.
#[derive(Args, Debug)]
pub struct BorrowersArgs {
    #[command(subcommand)]
    command: BorrowersCommand,
}

#[derive(Subcommand, Debug)]
enum BorrowersCommand {
    /// List every registered borrower
    List,
    /// Register a borrower
    Add {
        /// Given name
        #[arg(long)]
        first_name: String,
        /// Family name
        #[arg(long)]
        last_name: String,
        /// Date of birth (YYYY-MM-DD)
        #[arg(long)]
        birth_date: NaiveDate,
        /// Contact phone number
        #[arg(long)]
        phone: String,
        /// Contact email
        #[arg(long)]
        email: Option<String>,
        /// Home address
        #[arg(long)]
        address: Option<String>,
        /// Emergency contact name
        #[arg(long)]
        emergency_name: Option<String>,
        /// Emergency contact phone
        #[arg(long)]
        emergency_phone: Option<String>,
    },
    /// Update a borrower's contact details
    Update {
        /// Borrower id
        id: i64,
        /// New given name
        #[arg(long)]
        first_name: Option<String>,
        /// New family name
        #[arg(long)]
        last_name: Option<String>,
        /// New date of birth (YYYY-MM-DD)
        #[arg(long)]
        birth_date: Option<NaiveDate>,
        /// New contact phone number
        #[arg(long)]
        phone: Option<String>,
        /// New contact email
        #[arg(long)]
        email: Option<String>,
        /// New home address
        #[arg(long)]
        address: Option<String>,
    },
    /// Remove a borrower
    Remove {
        /// Borrower id
        id: i64,
    },
}

/// Runs the borrowers command.
///
/// # Errors
/// Returns an error if the gateway call fails.
pub async fn run_borrowers(ctx: &AppContext, args: BorrowersArgs) -> Result<()> {
    match args.command {
        BorrowersCommand::List => {
            ctx.store.initialize().await;
            let borrowers = ctx.store.borrowers().await;
            if let Some(message) = ctx.store.last_error().await {
                anyhow::bail!("failed to load borrowers: {message}");
            }
            print!("{}", render_borrowers(&borrowers));
        }
        BorrowersCommand::Add {
            first_name,
            last_name,
            birth_date,
            phone,
            email,
            address,
            emergency_name,
            emergency_phone,
        } => {
            let mut new = NewBorrower::new(first_name, last_name, birth_date, phone);
            if let Some(email) = email {
                new = new.with_email(email);
            }
            if let Some(address) = address {
                new = new.with_address(address);
            }
            if let (Some(name), Some(phone)) = (emergency_name, emergency_phone) {
                new = new.with_emergency_contact(name, phone);
            }

            let created = ctx.store.add_borrower(&new).await?;
            println!("registered borrower {} ({})", created.id, created.full_name);
        }
        BorrowersCommand::Update {
            id,
            first_name,
            last_name,
            birth_date,
            phone,
            email,
            address,
        } => {
            let update = BorrowerUpdate {
                first_name,
                last_name,
                birth_date,
                phone,
                email,
                address,
                ..BorrowerUpdate::default()
            };
            let updated = ctx.store.update_borrower(id, &update).await?;
            println!("updated borrower {} ({})", updated.id, updated.full_name);
        }
        BorrowersCommand::Remove { id } => {
            ctx.store.delete_borrower(id).await?;
            println!("removed borrower {id}");
        }
    }
    Ok(())
}

/// Renders borrowers as a plain table.
fn render_borrowers(borrowers: &[Borrower]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<6} {:<24} {:<12} {:<18} {}\n",
        "ID", "NAME", "BIRTH DATE", "PHONE", "EMAIL"
    ));
    for b in borrowers {
        out.push_str(&format!(
            "{:<6} {:<24} {:<12} {:<18} {}\n",
            b.id, b.full_name, b.birth_date, b.phone, b.email
        ));
    }
    out.push_str(&format!("total: {}\n", borrowers.len()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn borrower(id: i64, name: &str) -> Borrower {
        Borrower {
            id,
            first_name: name.to_string(),
            last_name: "Cruz".to_string(),
            full_name: format!("{name} Cruz"),
            birth_date: NaiveDate::from_ymd_opt(1992, 6, 1).unwrap(),
            email: String::new(),
            phone: "0917-555-0100".to_string(),
            address: String::new(),
            emergency_contact_name: String::new(),
            emergency_contact_phone: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_render_borrowers_lists_rows_and_total() {
        let table = render_borrowers(&[borrower(1, "Ana"), borrower(2, "Bea")]);

        assert!(table.contains("Ana Cruz"));
        assert!(table.contains("Bea Cruz"));
        assert!(table.contains("total: 2"));
    }

    #[test]
    fn test_render_borrowers_empty() {
        let table = render_borrowers(&[]);
        assert!(table.contains("total: 0"));
    }
}
