//! CLI module - Command-line interface for the pizzeria directory
//!
//! Parsed with clap; running without a subcommand starts the web server.

mod commands;

use clap::{Parser, Subcommand};

/// Pizzerías Argentina - directory of pizzerias by city and pizza style
#[derive(Parser)]
#[command(name = "pizzerias")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server (default)
    #[command(alias = "web")]
    Serve,

    /// Run one keyword/city search through the cache and print the page
    #[command(alias = "s")]
    Search {
        /// Pizza style, e.g. "Napolitana"
        keyword: String,
        /// City name, e.g. "Rosario"
        city: String,
        /// Display page (1-based)
        #[arg(long, short, default_value = "1")]
        page: usize,
    },

    /// Drop and rebuild the search cache table
    RecreateCache,

    /// Print the XML sitemap to stdout
    Sitemap,

    /// Create default config file
    #[command(alias = "--init")]
    Init,
}

pub use commands::*;
