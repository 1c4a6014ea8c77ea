//! CLI module for the NotifyHub workflow API

pub mod serve;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "notifyhub", version, about = "Notification workflow API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve,
}
