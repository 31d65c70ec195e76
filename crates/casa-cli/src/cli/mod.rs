pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[clap(name = "casa", about = "Offline-first property browser")]
#[clap(version)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,

    /// Path to configuration file (defaults to <config dir>/casa/config.toml)
    #[clap(long, global = true)]
    pub config: Option<PathBuf>,

    /// Treat the session as offline: reads come from the local cache,
    /// writes are rejected
    #[clap(long, global = true)]
    pub offline: bool,

    /// Output in JSON format
    #[clap(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all properties
    #[clap(name = "ls")]
    List,

    /// Show full details for one property
    #[clap(name = "show")]
    Show {
        /// Property id
        id: i64,
    },

    /// Add a new property (the server assigns the id)
    #[clap(name = "add")]
    Add {
        /// Listing date, YYYY-MM-DD
        #[clap(long)]
        date: String,
        /// Category, e.g. apartment, house
        #[clap(long = "type")]
        kind: String,
        #[clap(long)]
        address: String,
        #[clap(long)]
        bedrooms: u32,
        #[clap(long)]
        bathrooms: u32,
        #[clap(long)]
        price: f64,
        /// Floor area
        #[clap(long)]
        area: f64,
        #[clap(long, default_value = "")]
        notes: String,
    },

    /// Delete a property by id
    #[clap(name = "rm")]
    Rm {
        /// Property id
        id: i64,
    },

    /// Search properties with optional filters
    #[clap(name = "search")]
    Search {
        /// Category substring (case-insensitive)
        #[clap(long = "type")]
        kind: Option<String>,
        #[clap(long)]
        min_price: Option<f64>,
        #[clap(long)]
        max_price: Option<f64>,
        /// Exact bedroom count
        #[clap(long)]
        bedrooms: Option<u32>,
    },

    /// Follow the live property feed and merge pushed records
    #[clap(name = "watch")]
    Watch,
}
