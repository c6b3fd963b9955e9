//! CLI module for Kestrel
//!
//! Provides command-line interface parsing for the kestrel-server binary.
//! Uses clap for argument parsing and owo-colors for colored terminal output.

pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Kestrel - local retrieval core
///
/// Indexes a directory of text and PDF documents and assembles grounded
/// prompts from the chunks closest to a question.
#[derive(Parser, Debug)]
#[command(
    name = "kestrel-server",
    version,
    about = "Kestrel - local document retrieval and grounded prompt assembly",
    long_about = "Indexes .txt and .pdf documents into a persistent vector store and\n\
                  assembles grounded prompts from the chunks closest to a question.\n\n\
                  The store is bootstrapped from the documents directory on first use.",
    after_help = "EXAMPLES:\n    \
                  kestrel-server ingest ./docs                     # Ingest a directory\n    \
                  kestrel-server query \"Who founded the company?\" # Retrieve and build a prompt\n    \
                  kestrel-server query -k 5 \"What does SGFD do?\"   # Ask for five chunks\n    \
                  kestrel-server stats                             # Show store statistics"
)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "kestrel.toml", global = true)]
    pub config: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load, chunk, embed and store every .txt / .pdf file in a directory
    ///
    /// Appends to the existing store. Files that cannot be read are reported
    /// and skipped.
    Ingest {
        /// Directory to ingest (defaults to rag.documents_dir)
        dir: Option<PathBuf>,
    },

    /// Retrieve the chunks closest to a question and print the grounded prompt
    Query {
        /// The question to answer
        question: String,

        /// Number of chunks to retrieve (defaults to rag.top_k)
        #[arg(short, long)]
        k: Option<usize>,
    },

    /// Show vector store statistics
    Stats,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_query_with_k() {
        let cli = Cli::try_parse_from(["kestrel-server", "query", "-k", "5", "who?"]).unwrap();
        match cli.command {
            Commands::Query { question, k } => {
                assert_eq!(question, "who?");
                assert_eq!(k, Some(5));
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(cli.config, PathBuf::from("kestrel.toml"));
    }

    #[test]
    fn test_parse_ingest_default_dir() {
        let cli = Cli::try_parse_from(["kestrel-server", "--verbose", "ingest"]).unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Ingest { dir: None }));
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli =
            Cli::try_parse_from(["kestrel-server", "stats", "--config", "other.toml"]).unwrap();
        assert_eq!(cli.config, PathBuf::from("other.toml"));
        assert!(matches!(cli.command, Commands::Stats));
    }

    #[test]
    fn test_subcommand_required() {
        assert!(Cli::try_parse_from(["kestrel-server"]).is_err());
    }
}
