//! Run command - executes one monitor run and prints the report

use clap::Args;
use tracing::info;

use crate::config::AppConfig;
use crate::domain::monitor::MonitorMode;
use crate::infrastructure::logging;

/// Arguments for the run command
#[derive(Args, Clone)]
pub struct RunArgs {
    /// Evaluate the budget but log instead of disabling services
    #[arg(long)]
    pub dry_run: bool,
}

/// Execute a single monitor run
pub async fn run(args: RunArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    if args.dry_run {
        config.monitor.mode = MonitorMode::DryRun;
    }

    let monitor = crate::build_monitor(&config);
    let report = monitor.run().await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    info!("Monitor run finished");

    Ok(())
}
