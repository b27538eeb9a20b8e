//! Aspect topic aggregation CLI
//!
//! Groups extracted aspect phrases into ontology topics.
//!
//! # Usage
//!
//! ```bash
//! aspect-topics extract --aspects aspects.json [--embeddings PATH] [--ontology PATH]
//!                       [--sentiment PATH] [--output DIR]
//! aspect-topics show-config
//! ```
//!
//! # Configuration
//!
//! Configuration is loaded in order (later sources override earlier):
//! 1. Built-in defaults
//! 2. Config file (<config dir>/aspect-topics/config.toml)
//! 3. Environment variables (ASPECT_*)
//! 4. CLI flags

use anyhow::Result;
use clap::Parser;

use aspect_cli::{run_extract, show_config, Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Extract(args) => {
            run_extract(cli.config.as_deref(), cli.log_level.as_deref(), args)?;
        }
        Commands::ShowConfig => {
            show_config(cli.config.as_deref())?;
        }
    }

    Ok(())
}
