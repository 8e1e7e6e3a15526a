//! Tola Atom - render structured data as Atom 1.0 feeds.

mod cli;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands, render::run_render};
use tola_atom::{config::AtomConfig, logger};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = AtomConfig::load(&cli.config)?;

    match &cli.command {
        Commands::Render { args } => run_render(args, &config),
    }
}
