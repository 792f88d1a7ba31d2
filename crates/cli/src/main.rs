//! Pasarela CLI - Demo checkout runs and draft management.
//!
//! # Usage
//!
//! ```bash
//! # Run a scripted end-to-end checkout (offers to restore a stored draft)
//! pasarela demo
//!
//! # Ignore any stored draft and start fresh
//! pasarela demo --fresh
//!
//! # Inspect the stored draft
//! pasarela draft show
//!
//! # Remove the stored draft
//! pasarela draft clear
//! ```
//!
//! # Commands
//!
//! - `demo` - Drive the wizard through all four steps and confirm an order
//! - `draft show` - Print the persisted draft
//! - `draft clear` - Remove the persisted draft

#![cfg_attr(not(test), forbid(unsafe_code))]
// User-facing command output; logs go through tracing
#![allow(clippy::print_stdout)]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "pasarela")]
#[command(author, version, about = "Pasarela checkout wizard CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted end-to-end checkout
    Demo {
        /// Ignore any stored draft and start fresh
        #[arg(long)]
        fresh: bool,
    },
    /// Inspect or clear the persisted draft
    Draft {
        #[command(subcommand)]
        action: DraftAction,
    },
}

#[derive(Subcommand)]
enum DraftAction {
    /// Print the stored draft
    Show,
    /// Remove the stored draft
    Clear,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Demo { fresh } => commands::demo::run(fresh).await?,
        Commands::Draft { action } => match action {
            DraftAction::Show => commands::draft::show()?,
            DraftAction::Clear => commands::draft::clear()?,
        },
    }
    Ok(())
}
