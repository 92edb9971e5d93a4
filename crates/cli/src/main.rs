//! Urban Vibe CLI - Inspect and reset persisted storefront state.
//!
//! # Usage
//!
//! ```bash
//! # Show the saved cart
//! uv-cli cart show
//!
//! # Show the raw snapshot
//! uv-cli cart show --json
//!
//! # Empty the saved cart
//! uv-cli cart clear
//!
//! # Show or change the saved theme
//! uv-cli theme show
//! uv-cli theme set light
//! ```
//!
//! The data directory comes from `URBAN_VIBE_DATA_DIR` unless `--data-dir`
//! is given.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use urban_vibe_core::Theme;

mod commands;

use commands::CliError;

#[derive(Parser)]
#[command(name = "uv-cli")]
#[command(author, version, about = "Urban Vibe CLI tools")]
struct Cli {
    /// Directory holding the persisted slots
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect or reset the persisted cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Inspect or change the persisted theme
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the saved cart
    Show {
        /// Print the stored JSON snapshot instead of a summary
        #[arg(long)]
        json: bool,
    },
    /// Empty the saved cart
    Clear,
}

#[derive(Subcommand)]
enum ThemeAction {
    /// Print the saved theme
    Show,
    /// Save a theme (`light` or `dark`)
    Set { theme: Theme },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let store = commands::open_store(cli.data_dir)?;
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show { json } => commands::cart::show(store, json, &mut out)?,
            CartAction::Clear => commands::cart::clear(store, &mut out)?,
        },
        Commands::Theme { action } => match action {
            ThemeAction::Show => commands::theme::show(&store, &mut out)?,
            ThemeAction::Set { theme } => commands::theme::set(&store, theme, &mut out)?,
        },
    }
    Ok(())
}
