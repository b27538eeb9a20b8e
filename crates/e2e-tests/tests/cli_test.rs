//! End-to-end test of the `extract` command over fixture files.

use pretty_assertions::assert_eq;

use aspect_cli::{run_extract, ExtractArgs};
use aspect_topics::{LinkedAspect, Topic};
use e2e_tests::{occurrences, TestHarness};

fn path_string(path: &std::path::Path) -> String {
    path.to_string_lossy().to_string()
}

#[test]
fn test_extract_command_writes_tables() {
    let harness = TestHarness::new();
    let args = ExtractArgs {
        aspects: path_string(&harness.aspects_path),
        embeddings: Some(path_string(&harness.embeddings_path)),
        ontology: Some(path_string(&harness.ontology_path)),
        sentiment: Some(path_string(&harness.sentiment_path)),
        output: Some(path_string(&harness.output_dir)),
    };

    run_extract(None, Some("warn"), args).unwrap();

    let topics: Vec<Topic> = serde_json::from_str(
        &std::fs::read_to_string(harness.output_dir.join("topics.json")).unwrap(),
    )
    .unwrap();
    let aspects: Vec<LinkedAspect> = serde_json::from_str(
        &std::fs::read_to_string(harness.output_dir.join("aspects.json")).unwrap(),
    )
    .unwrap();

    assert!(!topics.is_empty());
    let read_back: Vec<_> = aspects.into_iter().map(|a| a.occurrence).collect();
    assert_eq!(read_back, occurrences());
}
