//! tdshop - roll tower defence shops from the command line
//!
//! # Commands
//!
//! - `tdshop roll` - Show the current shop selection for a level
//! - `tdshop buy` - Buy one card from the current selection
//! - `tdshop draws` - Print raw Squirrel3 draws for a seed
//!
//! # Usage
//!
//! ```bash
//! # Start a run with a fixed seed and show the first selection
//! tdshop roll --level levels/meadow.toml --seed 42
//!
//! # Buy the second card, then look at the next selection
//! tdshop buy --level levels/meadow.toml --index 1
//! tdshop roll --level levels/meadow.toml --round 1
//!
//! # Inspect the generator
//! tdshop draws --seed 42 -n 4
//! ```
//!
//! Set `RUST_LOG=debug` to see selection and downgrade logging.

mod draws;
mod shop;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// tdshop - deterministic tower defence shop rolls
#[derive(Parser)]
#[command(name = "tdshop")]
#[command(about = "Roll tower defence shop selections from level files")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current shop selection (rolling one if needed) and save it
    Roll(shop::RollArgs),

    /// Buy a card from the current selection
    Buy(shop::BuyArgs),

    /// Print successive generator draws
    Draws(draws::DrawsArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Roll(args) => shop::roll(args),
        Commands::Buy(args) => shop::buy(args),
        Commands::Draws(args) => draws::execute(args),
    }
}
