use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "astro-inventory")]
#[command(about = "Inventory of astrophotography sessions", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a directory tree and write the inventory CSV
    Scan {
        /// Root folder holding one sub-folder per object (defaults to `root_path`)
        root: Option<PathBuf>,
        /// Report path (defaults to `output_path`)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the fields parsed from a filename
    ParseFilename {
        name: String,
        /// Session folder name used for the filter fallback
        #[arg(short, long, default_value = "")]
        session: String,
    },
    /// Print configuration values
    PrintConfig,
}
