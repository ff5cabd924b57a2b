//! Command line argument parsing for the mayday CLI using clap.

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Mayday - disaster response message classification
#[derive(Parser, Debug, Clone)]
#[command(name = "mayday")]
#[command(about = "Clean, train on, and classify disaster response messages")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct MaydayArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl MaydayArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1,
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Clean and merge raw messages and categories into a dataset
    Process(ProcessArgs),

    /// Train the classification model on a cleaned dataset
    Train(TrainArgs),

    /// Classify a message with a trained model
    Predict(PredictArgs),

    /// Show statistics for a cleaned dataset
    Stats(StatsArgs),
}

/// Arguments for the ETL run
#[derive(Parser, Debug, Clone)]
pub struct ProcessArgs {
    /// Raw messages file (JSON lines)
    #[arg(value_name = "MESSAGES_FILE")]
    pub messages: PathBuf,

    /// Raw categories file (JSON lines)
    #[arg(value_name = "CATEGORIES_FILE")]
    pub categories: PathBuf,

    /// Output path for the cleaned dataset
    #[arg(value_name = "OUTPUT_FILE")]
    pub output: PathBuf,

    /// Also export the cleaned dataset as CSV to this path
    #[arg(long, value_name = "CSV_FILE")]
    pub csv: Option<PathBuf>,

    /// Skip malformed category rows instead of aborting
    #[arg(long)]
    pub skip_malformed: bool,
}

/// Arguments for model training
#[derive(Parser, Debug, Clone)]
pub struct TrainArgs {
    /// Cleaned dataset file produced by `process`
    #[arg(value_name = "DATASET_FILE")]
    pub dataset: PathBuf,

    /// Output path for the trained model artifact
    #[arg(value_name = "MODEL_FILE")]
    pub model: PathBuf,

    /// Seed for every randomized step of the run
    #[arg(long, default_value = "42")]
    pub seed: u64,

    /// Fraction of rows held out for final evaluation
    #[arg(long, default_value = "0.2")]
    pub test_size: f64,

    /// Number of cross-validation folds in the grid search
    #[arg(long, default_value = "3")]
    pub folds: usize,

    /// Grid values for the number of trees per forest (comma-separated)
    #[arg(long, value_delimiter = ',', default_value = "10,50,100")]
    pub n_estimators: Vec<usize>,

    /// Grid values for the minimum samples to split a node (comma-separated)
    #[arg(long, value_delimiter = ',', default_value = "2,4")]
    pub min_samples_split: Vec<usize>,
}

/// Arguments for single-message classification
#[derive(Parser, Debug, Clone)]
pub struct PredictArgs {
    /// Trained model artifact
    #[arg(value_name = "MODEL_FILE")]
    pub model: PathBuf,

    /// Message text to classify
    #[arg(value_name = "MESSAGE")]
    pub query: String,

    /// Only print labels predicted positive
    #[arg(long)]
    pub positive_only: bool,
}

/// Arguments for dataset statistics
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    /// Cleaned dataset file produced by `process`
    #[arg(value_name = "DATASET_FILE")]
    pub dataset: PathBuf,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}
