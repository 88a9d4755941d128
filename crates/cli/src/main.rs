use clap::{Parser, Subcommand};

mod commands;

use commands::{
    auth::{run_auth, AuthArgs},
    borrowers::{run_borrowers, BorrowersArgs},
    contracts::{run_contracts, ContractsArgs},
    offers::{run_offers, OffersArgs},
    payments::{run_payments, PaymentsArgs},
    summary::{run_summary, SummaryArgs},
    user::{run_user, UserArgs},
};

#[derive(Parser)]
#[command(name = "utang")]
#[command(about = "Lending ledger for financiers and borrowers", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config/Config.toml", global = true)]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show portfolio totals from the backend and the local mirror
    Summary(SummaryArgs),
    /// Manage borrowers
    Borrowers(BorrowersArgs),
    /// Manage lending contracts
    Contracts(ContractsArgs),
    /// Record and void payments
    Payments(PaymentsArgs),
    /// Manage loan offers
    Offers(OffersArgs),
    /// Show or change the device's role selection
    User(UserArgs),
    /// Manage the stored API bearer token
    Auth(AuthArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let ctx = commands::AppContext::load(&cli.config)?;

    match cli.command {
        Commands::Summary(args) => run_summary(&ctx, args).await,
        Commands::Borrowers(args) => run_borrowers(&ctx, args).await,
        Commands::Contracts(args) => run_contracts(&ctx, args).await,
        Commands::Payments(args) => run_payments(&ctx, args).await,
        Commands::Offers(args) => run_offers(&ctx, args).await,
        Commands::User(args) => run_user(&ctx, args).await,
        Commands::Auth(args) => run_auth(&ctx, args),
    }
}
