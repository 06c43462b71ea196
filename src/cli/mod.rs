//! CLI module for the spend guard
//!
//! Provides subcommands for the two ways the guard is deployed:
//! - `serve`: long-running HTTP service exposing the monitor API
//! - `run`: single monitor run for schedulers and cron jobs

pub mod run;
pub mod serve;

use clap::{Parser, Subcommand};

/// Spend guard - usage cost monitor with automatic billing shutoff
#[derive(Parser)]
#[command(name = "spendguard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server exposing health probes and the monitor API
    Serve,

    /// Execute one monitor run and print the report
    Run(run::RunArgs),
}
