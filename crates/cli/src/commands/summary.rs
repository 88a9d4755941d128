//! Portfolio summary command.

use anyhow::Result;
use clap::Args;
use rust_decimal::Decimal;

use utang_core::types::DashboardSummary;

use super::AppContext;

/// Arguments for the summary command.
#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Also recompute the lent/outstanding totals from the local mirror
    #[arg(long)]
    pub check_mirror: bool,
}

/// Runs the summary command.
///
/// # Errors
/// Returns an error if the gateway call fails.
pub async fn run_summary(ctx: &AppContext, args: SummaryArgs) -> Result<()> {
    let summary = ctx.gateway.dashboard_summary().await?;
    print!("{}", render_summary(&summary));

    if args.check_mirror {
        ctx.store.initialize().await;
        if let Some(message) = ctx.store.last_error().await {
            anyhow::bail!("failed to load the mirror: {message}");
        }
        let lent = ctx.store.total_lent_amount().await;
        let outstanding = ctx.store.total_outstanding().await;
        print!("{}", render_mirror_check(&summary, lent, outstanding));
    }
    Ok(())
}

/// Renders the backend's aggregate figures.
fn render_summary(summary: &DashboardSummary) -> String {
    format!(
        "borrowers:         {}\n\
         contracts:         {} ({} active, {} overdue)\n\
         lent out:          {}\n\
         outstanding:       {}\n\
         payments received: {}\n",
        summary.total_borrowers,
        summary.total_contracts,
        summary.active_contracts,
        summary.overdue_contracts,
        summary.total_lent_amount,
        summary.total_outstanding_balance,
        summary.total_payments_received,
    )
}

/// Compares the backend's totals with sums over the local mirror.
fn render_mirror_check(summary: &DashboardSummary, lent: Decimal, outstanding: Decimal) -> String {
    let verdict = if summary.total_lent_amount == lent
        && summary.total_outstanding_balance == outstanding
    {
        "mirror agrees with the backend"
    } else {
        "MISMATCH between mirror and backend"
    };
    format!(
        "mirror lent out:    {lent}\n\
         mirror outstanding: {outstanding}\n\
         {verdict}\n"
    )
}
