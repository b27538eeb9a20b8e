//! CLI argument parsing for the aspect topic tool.
//!
//! CLI flags override all other config sources.

use clap::{Args, Parser, Subcommand};

/// Aspect topic aggregation
///
/// Groups aspect phrases extracted from comments into ontology topics.
#[derive(Parser, Debug)]
#[command(name = "aspect-topics")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides default <config dir>/aspect-topics/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Aggregate aspect occurrences into topics
    Extract(ExtractArgs),

    /// Print the effective configuration
    ShowConfig,
}

/// Inputs and outputs of an extraction run
#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    /// JSON array of aspect occurrences
    #[arg(short, long)]
    pub aspects: String,

    /// Override the word-embedding table
    #[arg(short, long)]
    pub embeddings: Option<String>,

    /// Override the ontology export
    #[arg(long)]
    pub ontology: Option<String>,

    /// Override the sentiment lexicon
    #[arg(short, long)]
    pub sentiment: Option<String>,

    /// Override the output directory
    #[arg(short, long)]
    pub output: Option<String>,
}
