//! CLI argument structures
//!
//! Defines the command-line interface: the main structure and all
//! subcommand definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Ingest, merge and analyze county health survey extracts
#[derive(Parser)]
#[command(name = "countystat")]
#[command(about = "countystat - County health survey ingestion, merge & exploratory statistics", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Merge the raw per-topic extracts of each dataset into one wide table
    Convert {
        /// Directory holding the raw extracts and the column dictionary
        #[arg(long, default_value = "original_data")]
        data_dir: PathBuf,

        /// Directory the merged tables are written to
        #[arg(long, default_value = "data")]
        out_dir: PathBuf,

        /// Column dictionary file name inside the data directory
        #[arg(long, default_value = "CHNAME.TXT")]
        dictionary: String,

        /// Dataset identifiers to convert (default: the full survey)
        #[arg(value_name = "DATASET")]
        datasets: Vec<String>,
    },

    /// Screen every survey variable against an outcome column
    Analyze {
        /// Merged table produced by `convert`
        input: PathBuf,

        /// Column dictionary file
        #[arg(long, default_value = "original_data/CHNAME.TXT")]
        dictionary: PathBuf,

        /// Outcome column (normalized name) to screen against
        #[arg(short, long)]
        outcome: String,

        /// Sex stratum to keep
        #[arg(long, default_value = "T")]
        sex: String,

        /// Area aggregation code to keep
        #[arg(long, default_value = "3")]
        xiang: i64,

        /// Variable code prefixes excluded from screening
        #[arg(long = "exclude-prefix", value_name = "PREFIX", default_value = "M")]
        exclude_prefixes: Vec<String>,

        /// Also write the ranked results as JSON to this path
        #[arg(long, value_name = "FILE")]
        json: Option<PathBuf>,
    },

    /// Scatter-plot one variable against another
    Plot {
        /// Merged table produced by `convert`
        input: PathBuf,

        /// Variable on the x axis (normalized name)
        #[arg(short = 'x', long = "x-col", value_name = "COLUMN")]
        x: String,

        /// Variable on the y axis (normalized name)
        #[arg(short = 'y', long = "y-col", value_name = "COLUMN")]
        y: String,

        /// Output PNG path
        #[arg(short, long, default_value = "scatter.png")]
        output: PathBuf,

        /// Sex stratum to keep
        #[arg(long, default_value = "T")]
        sex: String,

        /// Area aggregation code to keep
        #[arg(long, default_value = "3")]
        xiang: i64,

        /// Overlay the fitted regression line
        #[arg(long)]
        fit: bool,
    },

    /// Print the column dictionary
    Columns {
        /// Column dictionary file
        dictionary: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}
