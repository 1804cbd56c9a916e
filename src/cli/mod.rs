//! Command-line interface.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Belpaese - multilingual travel content service
#[derive(Parser)]
#[command(name = "belpaese")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the config file (defaults to config.toml)
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    #[command(alias = "web")]
    Serve,

    /// Search destinations and articles
    #[command(alias = "s")]
    Search {
        /// Search query
        #[arg(required = true)]
        query: Vec<String>,
        /// Language of the results
        #[arg(long)]
        lang: Option<String>,
    },

    /// Show the slug trail of a destination
    #[command(alias = "b")]
    Breadcrumb {
        /// Destination ID
        id: String,
        /// Language of the trail
        #[arg(long)]
        lang: Option<String>,
    },

    /// Generate the XML sitemap
    Sitemap {
        /// Write to a file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Check that the content backend is reachable
    #[command(alias = "-c", alias = "--check")]
    Check,

    /// Create default config file
    #[command(alias = "init")]
    InitConfig,
}

pub use commands::*;
