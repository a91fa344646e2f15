use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "nearbite", version, about = "Nearby restaurant recommendations from natural-language queries")]
pub struct Cli {
    /// Candidate source (live or dataset); overrides NEARBITE_MODE
    #[arg(long, global = true)]
    pub mode: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        /// Bind address; overrides NEARBITE_BIND
        #[arg(long)]
        bind: Option<String>,
    },
    /// Rank restaurants near a location
    Recommend {
        query: String,
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Search radius in meters
        #[arg(long, default_value = "100")]
        radius: f64,
        #[arg(long, default_value = "5")]
        k: usize,
    },
    /// Rank, then summarize the best picks in plain language
    Chat {
        query: String,
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Search radius in meters
        #[arg(long, default_value = "100")]
        radius: f64,
        #[arg(long, default_value = "20")]
        k: usize,
    },
    /// Build dataset artifacts from a restaurant CSV
    Preprocess {
        csv: PathBuf,
        /// Output directory; defaults to NEARBITE_DATA_DIR
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Show the active configuration and loaded artifacts
    Info,
}
