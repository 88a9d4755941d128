//! Bearer-token management commands.
//!
//! The token is read from durable storage on every API request, so these
//! commands take effect for any later invocation without restarting
//! anything.

use anyhow::Result;
use clap::{Args, Subcommand};

use utang_gateway_http::TokenStore;

use super::AppContext;

/// Arguments for the auth command.
#[derive(Args, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    command: AuthCommand,
}

#[derive(Subcommand, Debug)]
enum AuthCommand {
    /// Store the bearer token API requests will carry
    SetToken {
        /// The token value
        token: String,
    },
    /// Show whether a token is stored
    Status,
    /// Remove the stored token
    Clear,
}

/// Runs the auth command.
///
/// # Errors
/// Returns an error if the token cannot be written or removed.
pub fn run_auth(ctx: &AppContext, args: AuthArgs) -> Result<()> {
    let tokens = TokenStore::new(ctx.storage.clone());
    match args.command {
        AuthCommand::SetToken { token } => {
            tokens.set_token(&token)?;
            println!("token stored");
        }
        AuthCommand::Status => {
            if tokens.has_token() {
                println!("a token is stored; API requests will carry it");
            } else {
                println!("no token stored; API requests go out unauthenticated");
            }
        }
        AuthCommand::Clear => {
            tokens.clear()?;
            println!("token removed");
        }
    }
    Ok(())
}
