//! End-to-end pipeline test: process raw files, train a model, and
//! classify messages through a reloaded artifact.

use std::fs;
use std::path::Path;

use clap::Parser;

use mayday::cli::args::MaydayArgs;
use mayday::cli::commands::execute_command;
use mayday::dataset::store;
use mayday::inference::InferenceService;
use mayday::stats::DatasetStats;

fn write_raw_files(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let water_lines = [
        "we urgently need water in the camp",
        "please send water to the shelter",
        "water supply was destroyed by the storm",
        "children here have no water left",
        "requesting water for two hundred families",
        "the well collapsed and water is gone",
        "clean water needed after the flood",
        "water tanks are empty since yesterday",
        "no drinking water in the village",
        "send water trucks to the east district",
        "water purification tablets requested",
        "we are out of water and supplies",
    ];
    let food_lines = [
        "people are hungry and need food",
        "please send food to the stadium",
        "food stocks ran out this morning",
        "requesting food for the refugees",
        "no food has arrived for three days",
        "the families here need food aid",
        "food distribution point was closed",
        "we need rice and other food items",
        "hungry children waiting for food",
        "food convoy has not reached us",
        "emergency food rations requested",
        "send food packages to the school",
    ];

    let mut messages = String::new();
    let mut categories = String::new();
    let mut id = 1;
    for line in water_lines {
        messages.push_str(&format!(
            "{{\"id\":{id},\"message\":\"{line}\",\"genre\":\"direct\"}}\n"
        ));
        categories.push_str(&format!("{{\"id\":{id},\"categories\":\"water-1;food-0\"}}\n"));
        id += 1;
    }
    for line in food_lines {
        messages.push_str(&format!(
            "{{\"id\":{id},\"message\":\"{line}\",\"genre\":\"news\"}}\n"
        ));
        categories.push_str(&format!("{{\"id\":{id},\"categories\":\"water-0;food-1\"}}\n"));
        id += 1;
    }
    // an exact duplicate of the first row, removed by cleaning
    messages.push_str("{\"id\":1,\"message\":\"we urgently need water in the camp\",\"genre\":\"direct\"}\n");
    categories.push_str("{\"id\":1,\"categories\":\"water-1;food-0\"}\n");

    let messages_path = dir.join("messages.jsonl");
    let categories_path = dir.join("categories.jsonl");
    fs::write(&messages_path, messages).unwrap();
    fs::write(&categories_path, categories).unwrap();
    (messages_path, categories_path)
}

fn run(args: &[&str]) {
    let parsed = MaydayArgs::try_parse_from(args).unwrap();
    execute_command(parsed).unwrap();
}

#[test]
fn test_process_train_predict_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let (messages, categories) = write_raw_files(dir.path());
    let dataset_path = dir.path().join("dataset.jsonl");
    let model_path = dir.path().join("model.bin");

    run(&[
        "mayday",
        "--quiet",
        "process",
        messages.to_str().unwrap(),
        categories.to_str().unwrap(),
        dataset_path.to_str().unwrap(),
    ]);

    let dataset = store::load_cleaned(&dataset_path).unwrap();
    assert_eq!(dataset.records.len(), 24, "duplicate row should be removed");
    assert_eq!(dataset.vocabulary.names(), &["water", "food"]);

    run(&[
        "mayday",
        "--quiet",
        "train",
        dataset_path.to_str().unwrap(),
        model_path.to_str().unwrap(),
        "--n-estimators",
        "10",
        "--min-samples-split",
        "2",
        "--folds",
        "2",
        "--test-size",
        "0.25",
        "--seed",
        "42",
    ]);

    let service = InferenceService::load(&model_path).unwrap();

    let prediction = service.predict("we need water for the camp").unwrap();
    assert_eq!(prediction.len(), 2);
    assert!(prediction.labels().iter().all(|(_, v)| *v == 0 || *v == 1));
    assert_eq!(prediction.get("water"), Some(1));

    let prediction = service.predict("please send food rations").unwrap();
    assert_eq!(prediction.get("food"), Some(1));

    // empty query is valid and stays binary
    let prediction = service.predict("").unwrap();
    assert_eq!(prediction.len(), 2);
    assert!(prediction.labels().iter().all(|(_, v)| *v == 0 || *v == 1));

    // a reloaded service answers identically
    let reloaded = InferenceService::load(&model_path).unwrap();
    assert_eq!(
        reloaded.predict("we need water for the camp").unwrap(),
        service.predict("we need water for the camp").unwrap()
    );
}

#[test]
fn test_process_rejects_malformed_rows_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let messages_path = dir.path().join("messages.jsonl");
    let categories_path = dir.path().join("categories.jsonl");
    fs::write(
        &messages_path,
        concat!(
            "{\"id\":1,\"message\":\"need water\",\"genre\":\"direct\"}\n",
            "{\"id\":2,\"message\":\"need food\",\"genre\":\"direct\"}\n",
        ),
    )
    .unwrap();
    fs::write(
        &categories_path,
        concat!(
            "{\"id\":1,\"categories\":\"water-1;food-0\"}\n",
            "{\"id\":2,\"categories\":\"water-1\"}\n",
        ),
    )
    .unwrap();
    let dataset_path = dir.path().join("dataset.jsonl");

    let parsed = MaydayArgs::try_parse_from([
        "mayday",
        "--quiet",
        "process",
        messages_path.to_str().unwrap(),
        categories_path.to_str().unwrap(),
        dataset_path.to_str().unwrap(),
    ])
    .unwrap();
    assert!(execute_command(parsed).is_err());

    // with --skip-malformed the run succeeds and drops the bad row
    let parsed = MaydayArgs::try_parse_from([
        "mayday",
        "--quiet",
        "process",
        messages_path.to_str().unwrap(),
        categories_path.to_str().unwrap(),
        dataset_path.to_str().unwrap(),
        "--skip-malformed",
    ])
    .unwrap();
    execute_command(parsed).unwrap();

    let dataset = store::load_cleaned(&dataset_path).unwrap();
    assert_eq!(dataset.records.len(), 1);
}

#[test]
fn test_process_exports_csv_alongside_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let (messages, categories) = write_raw_files(dir.path());
    let dataset_path = dir.path().join("dataset.jsonl");
    let csv_path = dir.path().join("dataset.csv");

    run(&[
        "mayday",
        "--quiet",
        "process",
        messages.to_str().unwrap(),
        categories.to_str().unwrap(),
        dataset_path.to_str().unwrap(),
        "--csv",
        csv_path.to_str().unwrap(),
    ]);

    let csv = fs::read_to_string(&csv_path).unwrap();
    let header = csv.lines().next().unwrap();
    assert_eq!(header, "id,message,original,genre,water,food");
    assert_eq!(csv.lines().count(), 25);
}

#[test]
fn test_stats_over_processed_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let (messages, categories) = write_raw_files(dir.path());
    let dataset_path = dir.path().join("dataset.jsonl");

    run(&[
        "mayday",
        "--quiet",
        "process",
        messages.to_str().unwrap(),
        categories.to_str().unwrap(),
        dataset_path.to_str().unwrap(),
    ]);

    let dataset = store::load_cleaned(&dataset_path).unwrap();
    let stats = DatasetStats::compute(&dataset).unwrap();

    assert_eq!(stats.n_records, 24);
    assert_eq!(stats.genre_counts["direct"], 12);
    assert_eq!(stats.genre_counts["news"], 12);
    assert_eq!(stats.label_counts[0].label, "water");
    assert_eq!(stats.label_counts[0].count, 12);
    assert_eq!(stats.label_counts[1].count, 12);
}
