//! Command implementations for the mayday CLI.

use std::time::Instant;

use crate::analysis::analyzer::{Analyzer, MessageAnalyzer};
use crate::cli::args::*;
use crate::cli::output::*;
use crate::dataset::cleaner::{DataCleaner, MalformedRowPolicy};
use crate::dataset::store::{self, CleanedDataset};
use crate::error::Result;
use crate::features::TfidfVectorizer;
use crate::inference::InferenceService;
use crate::model::artifact::ModelArtifact;
use crate::model::evaluate::{evaluate, format_report};
use crate::model::multioutput::LabelMatrix;
use crate::model::selection::train_test_split;
use crate::model::trainer::{GridSearch, ParamGrid};
use crate::stats::DatasetStats;

/// Execute a CLI command.
pub fn execute_command(args: MaydayArgs) -> Result<()> {
    match &args.command {
        Command::Process(process_args) => process_data(process_args.clone(), &args),
        Command::Train(train_args) => train_model(train_args.clone(), &args),
        Command::Predict(predict_args) => predict_message(predict_args.clone(), &args),
        Command::Stats(stats_args) => show_stats(stats_args.clone(), &args),
    }
}

/// Run the ETL: load, merge, clean, and persist the dataset.
fn process_data(args: ProcessArgs, cli_args: &MaydayArgs) -> Result<()> {
    if cli_args.verbosity() > 0 {
        println!(
            "Loading data...\n    MESSAGES: {}\n    CATEGORIES: {}",
            args.messages.display(),
            args.categories.display()
        );
    }
    let messages = store::load_messages(&args.messages)?;
    let categories = store::load_categories(&args.categories)?;

    if cli_args.verbosity() > 0 {
        println!("Cleaning data...");
    }
    let policy = if args.skip_malformed {
        MalformedRowPolicy::SkipAndLog
    } else {
        MalformedRowPolicy::Abort
    };
    let cleaner = DataCleaner::new().with_policy(policy);
    let merged = cleaner.merge(messages, categories);
    let outcome = cleaner.clean(merged)?;

    if cli_args.verbosity() > 0 {
        println!("Saving data...\n    DATASET: {}", args.output.display());
    }
    let dataset = CleanedDataset {
        vocabulary: outcome.vocabulary,
        records: outcome.records,
    };
    store::save_cleaned(&dataset, &args.output)?;
    if let Some(csv_path) = &args.csv {
        store::export_csv(&dataset, csv_path)?;
        if cli_args.verbosity() > 1 {
            println!("    CSV: {}", csv_path.display());
        }
    }

    output_result(
        "Cleaned data saved to dataset file",
        &ProcessResult {
            input_rows: outcome.report.input_rows,
            malformed_rows: outcome.report.malformed_rows,
            duplicate_rows: outcome.report.duplicate_rows,
            output_rows: outcome.report.output_rows,
            n_labels: dataset.vocabulary.len(),
            output_path: args.output.to_string_lossy().to_string(),
        },
        cli_args,
    )
}

/// Train the model: vectorize, grid-search, evaluate, and save the artifact.
fn train_model(args: TrainArgs, cli_args: &MaydayArgs) -> Result<()> {
    let start_time = Instant::now();

    if cli_args.verbosity() > 0 {
        println!("Loading data...\n    DATASET: {}", args.dataset.display());
    }
    let dataset = store::load_cleaned(&args.dataset)?;

    let analyzer = MessageAnalyzer::new();
    let corpus = dataset
        .records
        .iter()
        .map(|record| analyzer.normalize(&record.message))
        .collect::<Result<Vec<_>>>()?;
    let labels = dataset
        .records
        .iter()
        .map(|record| record.labels.clone())
        .collect();
    let y = LabelMatrix::new(labels, dataset.vocabulary.len())?;

    let (train_idx, test_idx) = train_test_split(dataset.records.len(), args.test_size, args.seed)?;
    let train_corpus: Vec<Vec<String>> = train_idx.iter().map(|&i| corpus[i].clone()).collect();
    let test_corpus: Vec<Vec<String>> = test_idx.iter().map(|&i| corpus[i].clone()).collect();

    if cli_args.verbosity() > 0 {
        println!("Building model...");
    }
    // the vectorizer only ever sees the training split
    let vectorizer = TfidfVectorizer::fit(&train_corpus)?;
    let x_train = vectorizer.transform(&train_corpus);
    let x_test = vectorizer.transform(&test_corpus);
    let y_train = y.select(&train_idx);
    let y_test = y.select(&test_idx);

    if cli_args.verbosity() > 0 {
        println!("Training model...");
    }
    let grid = ParamGrid {
        n_estimators: args.n_estimators.clone(),
        min_samples_split: args.min_samples_split.clone(),
    };
    let outcome = GridSearch::new(grid)
        .with_folds(args.folds)
        .with_seed(args.seed)
        .fit(&x_train, &y_train, &dataset.vocabulary)?;

    if cli_args.verbosity() > 0 {
        println!("Evaluating model...");
    }
    let reports = evaluate(&outcome.model, &x_test, &y_test)?;
    if cli_args.verbosity() > 0 {
        println!("{}", format_report(&reports));
    }

    if cli_args.verbosity() > 0 {
        println!("Saving model...\n    MODEL: {}", args.model.display());
    }
    let mean_cv_score = outcome
        .candidates
        .iter()
        .find(|c| c.params == outcome.best_params)
        .map(|c| c.mean())
        .unwrap_or(f64::NAN);
    let artifact = ModelArtifact::new(
        vectorizer,
        dataset.vocabulary.clone(),
        outcome.model,
        outcome.best_params,
    );
    artifact.save(&args.model)?;

    output_result(
        "Trained model saved",
        &TrainResult {
            best_params: outcome.best_params,
            mean_cv_score,
            reports,
            model_path: args.model.to_string_lossy().to_string(),
            duration_ms: start_time.elapsed().as_millis() as u64,
        },
        cli_args,
    )
}

/// Classify a single message with a saved model.
fn predict_message(args: PredictArgs, cli_args: &MaydayArgs) -> Result<()> {
    let service = InferenceService::load(&args.model)?;
    let prediction = service.predict(&args.query)?;

    if args.positive_only {
        if cli_args.verbosity() > 0 {
            println!("Message: {}", args.query);
        }
        for label in prediction.positive_labels() {
            println!("{label}");
        }
        return Ok(());
    }

    output_result(
        &format!("Message: {}", args.query),
        &PredictResult {
            query: args.query.clone(),
            prediction,
        },
        cli_args,
    )
}

/// Print summary statistics for a cleaned dataset.
fn show_stats(args: StatsArgs, cli_args: &MaydayArgs) -> Result<()> {
    let dataset = store::load_cleaned(&args.dataset)?;
    let stats = DatasetStats::compute(&dataset)?;
    output_stats(&stats, cli_args)
}
