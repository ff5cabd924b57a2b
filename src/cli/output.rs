//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{MaydayArgs, OutputFormat};
use crate::error::Result;
use crate::inference::Prediction;
use crate::model::evaluate::LabelReport;
use crate::model::trainer::HyperParams;
use crate::stats::DatasetStats;

/// Result structure for the ETL run.
#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessResult {
    pub input_rows: usize,
    pub malformed_rows: usize,
    pub duplicate_rows: usize,
    pub output_rows: usize,
    pub n_labels: usize,
    pub output_path: String,
}

/// Result structure for a training run.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrainResult {
    pub best_params: HyperParams,
    pub mean_cv_score: f64,
    pub reports: Vec<LabelReport>,
    pub model_path: String,
    pub duration_ms: u64,
}

/// Result structure for a prediction.
#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResult {
    pub query: String,
    pub prediction: Prediction,
}

/// Output a result in the selected format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &MaydayArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

fn output_human<T: Serialize>(message: &str, result: &T, args: &MaydayArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
    }

    let value = serde_json::to_value(result)?;
    match std::any::type_name::<T>() {
        name if name.contains("ProcessResult") => output_process_human(&value),
        name if name.contains("TrainResult") => output_train_human(&value),
        name if name.contains("PredictResult") => output_predict_human(&value),
        name if name.contains("DatasetStats") => output_stats_human(&value),
        _ => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
    }
}

fn output_json<T: Serialize>(result: &T, args: &MaydayArgs) -> Result<()> {
    let rendered = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };
    println!("{rendered}");
    Ok(())
}

fn output_process_human(value: &serde_json::Value) -> Result<()> {
    println!("  input rows:     {}", value["input_rows"]);
    println!("  malformed rows: {}", value["malformed_rows"]);
    println!("  duplicate rows: {}", value["duplicate_rows"]);
    println!("  output rows:    {}", value["output_rows"]);
    println!("  labels:         {}", value["n_labels"]);
    println!(
        "  saved to:       {}",
        value["output_path"].as_str().unwrap_or("")
    );
    Ok(())
}

fn output_train_human(value: &serde_json::Value) -> Result<()> {
    let params = &value["best_params"];
    println!(
        "  best parameters: n_estimators={}, min_samples_split={}",
        params["n_estimators"], params["min_samples_split"]
    );
    if let Some(score) = value["mean_cv_score"].as_f64() {
        println!("  mean cv score:   {score:.4}");
    }
    if let Some(duration) = value["duration_ms"].as_u64() {
        println!("  training time:   {:.1}s", duration as f64 / 1000.0);
    }
    println!(
        "  saved to:        {}",
        value["model_path"].as_str().unwrap_or("")
    );
    Ok(())
}

fn output_predict_human(value: &serde_json::Value) -> Result<()> {
    if let Some(labels) = value["prediction"]["labels"].as_array() {
        for pair in labels {
            if let (Some(name), Some(v)) = (pair[0].as_str(), pair[1].as_u64()) {
                println!("  {name:<24} {v}");
            }
        }
    }
    Ok(())
}

fn output_stats_human(value: &serde_json::Value) -> Result<()> {
    println!("  records: {}", value["n_records"]);
    println!("  labels:  {}", value["n_labels"]);
    if let Some(mean) = value["mean_word_count"].as_f64() {
        println!("  mean message length: {mean:.1} words");
    }
    println!("  genres:");
    if let Some(genres) = value["genre_counts"].as_object() {
        for (genre, count) in genres {
            println!("    {genre:<12} {count}");
        }
    }
    println!("  positive counts:");
    if let Some(labels) = value["label_counts"].as_array() {
        for entry in labels {
            if let (Some(label), Some(count)) = (entry["label"].as_str(), entry["count"].as_u64()) {
                println!("    {label:<24} {count}");
            }
        }
    }
    Ok(())
}

/// Convenience wrappers used by the command implementations.
pub fn output_stats(stats: &DatasetStats, args: &MaydayArgs) -> Result<()> {
    output_result("Dataset statistics", stats, args)
}
