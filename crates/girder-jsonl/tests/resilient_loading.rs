//! File-level tests for resilient loading and atomic saves.

use girder_jsonl::{read_jsonl_resilient, write_jsonl_atomic, Warning};
use serde::{Deserialize, Serialize};
use std::io::Write;
use tempfile::NamedTempFile;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct EdgeRow {
    id: i64,
    from: i64,
    to: i64,
}

fn rows() -> Vec<EdgeRow> {
    vec![
        EdgeRow { id: 1, from: 1, to: 2 },
        EdgeRow { id: 2, from: 2, to: 3 },
    ]
}

#[tokio::test]
async fn saved_file_loads_without_warnings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("edges.jsonl");

    write_jsonl_atomic(&path, &rows()).await.unwrap();
    let (loaded, warnings) = read_jsonl_resilient::<EdgeRow, _>(&path).await.unwrap();

    assert_eq!(loaded, rows());
    assert!(warnings.is_empty());
}

#[tokio::test]
async fn missing_file_reads_as_empty() {
    let dir = tempfile::tempdir().unwrap();
    let (loaded, warnings) = read_jsonl_resilient::<EdgeRow, _>(dir.path().join("absent.jsonl"))
        .await
        .unwrap();

    assert!(loaded.is_empty());
    assert!(warnings.is_empty());
}

#[tokio::test]
async fn corrupted_lines_become_warnings() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, r#"{{"id":1,"from":1,"to":2}}"#).unwrap();
    writeln!(file, r#"{{"id":2,"from":2"#).unwrap();
    writeln!(file).unwrap();
    writeln!(file, r#"{{"id":"three","from":2,"to":3}}"#).unwrap();
    writeln!(file, r#"{{"id":4,"from":3,"to":4}}"#).unwrap();
    file.flush().unwrap();

    let (loaded, warnings) = read_jsonl_resilient::<EdgeRow, _>(file.path())
        .await
        .unwrap();

    assert_eq!(
        loaded,
        vec![
            EdgeRow { id: 1, from: 1, to: 2 },
            EdgeRow { id: 4, from: 3, to: 4 },
        ]
    );
    let lines: Vec<usize> = warnings.iter().map(Warning::line_number).collect();
    assert_eq!(lines, vec![2, 4]);
    assert!(warnings.iter().all(|w| w.kind() == "malformed_json"));
}
