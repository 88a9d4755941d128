//! Role selection commands.

use anyhow::Result;
use clap::{Args, Subcommand};

use utang_core::types::{CurrentUser, UserRole};

use super::AppContext;

/// Arguments for the user command.
#[derive(Args, Debug)]
pub struct UserArgs {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Subcommand, Debug)]
enum UserCommand {
    /// Show the device's role selection
    Show,
    /// Select the role this device acts as
    Set {
        /// Role (financier or borrower)
        #[arg(long)]
        role: UserRole,
        /// Borrower identity, required when the role is borrower
        #[arg(long)]
        borrower_id: Option<i64>,
    },
    /// Clear the role selection
    Clear,
}

/// Runs the user command.
///
/// # Errors
/// Returns an error if persisting the selection fails.
pub async fn run_user(ctx: &AppContext, args: UserArgs) -> Result<()> {
    match args.command {
        UserCommand::Show => {
            ctx.store.initialize().await;
            println!("{}", describe(ctx.store.current_user().await.as_ref()));
        }
        UserCommand::Set { role, borrower_id } => {
            if role == UserRole::Borrower && borrower_id.is_none() {
                anyhow::bail!("--borrower-id is required when the role is borrower");
            }
            ctx.store.set_current_user(role, borrower_id).await?;
            println!("{}", describe(ctx.store.current_user().await.as_ref()));
        }
        UserCommand::Clear => {
            ctx.store.clear_current_user().await?;
            println!("role selection cleared");
        }
    }
    Ok(())
}

/// One-line description of a role selection.
fn describe(user: Option<&CurrentUser>) -> String {
    match user {
        Some(CurrentUser {
            role: UserRole::Borrower,
            borrower_id: Some(id),
        }) => format!("acting as borrower {id}"),
        Some(CurrentUser {
            role: UserRole::Borrower,
            borrower_id: None,
        }) => "acting as borrower (no borrower record linked)".to_string(),
        Some(CurrentUser {
            role: UserRole::Financier,
            ..
        }) => "acting as financier".to_string(),
        None => "no role selected".to_string(),
    }
}
