//! Tests for the timing parser over real files

use crate::app::services::timing_parser::TimingParser;
use crate::Error;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_file(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

fn standard_race_folder() -> TempDir {
    let temp = TempDir::new().unwrap();
    write_file(
        temp.path(),
        "PC1START.csv",
        "lane,time,number\nA,09:00:00.00,1\nA,09:02:00.00,2\n",
    );
    write_file(
        temp.path(),
        "PC1GOAL.csv",
        "lane,time,number\nA,09:01:30.50,1\nA,09:03:45.00,2\n",
    );
    temp
}

#[test]
fn test_parse_all_counts() {
    let temp = standard_race_folder();
    write_file(temp.path(), "notes.csv", "lane,time,number\nA,09:00:00,1\n");

    let mut parser = TimingParser::new(temp.path());
    let summary = parser.parse_all().unwrap();

    assert_eq!(summary.files_parsed, 2);
    assert_eq!(summary.files_skipped, 1);
    assert_eq!(summary.bib_count, 2);
    assert_eq!(parser.bibs(), vec![1, 2]);
}

#[test]
fn test_passage_time_round_trip() {
    let temp = standard_race_folder();
    let mut parser = TimingParser::new(temp.path());
    parser.parse_all().unwrap();

    let elapsed = parser.passage_time(1, "PC1").unwrap();
    assert!((elapsed - 90.5).abs() < 1e-9);
}

#[test]
fn test_missing_endpoint_is_no_data() {
    let temp = TempDir::new().unwrap();
    write_file(temp.path(), "PC1START.csv", "lane,time,number\nA,09:00:00,1\n");

    let mut parser = TimingParser::new(temp.path());
    parser.parse_all().unwrap();

    assert!(parser.has_start(1, "PC1"));
    assert!(!parser.has_goal(1, "PC1"));
    assert!(parser.passage_time(1, "PC1").is_none());
}

#[test]
fn test_combined_filename_feeds_two_sections() {
    let temp = TempDir::new().unwrap();
    write_file(
        temp.path(),
        "PC1GOAL_PC2START.csv",
        "lane,time,number\nA,10:00:00,5\n",
    );

    let mut parser = TimingParser::new(temp.path());
    parser.parse_all().unwrap();

    assert!(parser.has_goal(5, "PC1"));
    assert!(parser.has_start(5, "PC2"));
    assert_eq!(parser.records().len(), 2);
}

#[test]
fn test_float_bib_cells() {
    let temp = TempDir::new().unwrap();
    write_file(
        temp.path(),
        "PC1START.csv",
        "lane,time,number\nA,09:00:00,7.0\n",
    );

    let mut parser = TimingParser::new(temp.path());
    parser.parse_all().unwrap();
    assert!(parser.has_start(7, "PC1"));
}

#[test]
fn test_blank_bib_and_blank_time_rows_skipped() {
    let temp = TempDir::new().unwrap();
    write_file(
        temp.path(),
        "PC1START.csv",
        "lane,time,number\nA,09:00:00,\nA,,3\nA,09:05:00,4\n",
    );

    let mut parser = TimingParser::new(temp.path());
    let summary = parser.parse_all().unwrap();

    assert_eq!(summary.bib_count, 1);
    assert!(parser.has_start(4, "PC1"));
    assert!(!parser.has_start(3, "PC1"));
}

#[test]
fn test_duplicate_bib_in_file_fails_batch() {
    let temp = TempDir::new().unwrap();
    write_file(
        temp.path(),
        "PC1START.csv",
        "lane,time,number\nA,09:00:00,1\nA,09:05:00,1\n",
    );

    let mut parser = TimingParser::new(temp.path());
    match parser.parse_all().unwrap_err() {
        Error::TimingParse { file, message } => {
            assert_eq!(file, "PC1START.csv");
            assert!(message.contains("bib 1"));
        }
        other => panic!("Expected TimingParse error, got {:?}", other),
    }
    // Nothing from the failed batch remains queryable
    assert!(parser.bibs().is_empty());
    assert!(parser.records().is_empty());
}

#[test]
fn test_missing_time_column_fails() {
    let temp = TempDir::new().unwrap();
    write_file(temp.path(), "PC1START.csv", "lane,stamp,number\nA,09:00:00,1\n");

    let mut parser = TimingParser::new(temp.path());
    match parser.parse_all().unwrap_err() {
        Error::TimingParse { file, message } => {
            assert_eq!(file, "PC1START.csv");
            assert!(message.contains("time column"));
        }
        other => panic!("Expected TimingParse error, got {:?}", other),
    }
}

#[test]
fn test_time_column_last_fails() {
    let temp = TempDir::new().unwrap();
    write_file(temp.path(), "PC1START.csv", "lane,number,time\nA,1,09:00:00\n");

    let mut parser = TimingParser::new(temp.path());
    match parser.parse_all().unwrap_err() {
        Error::TimingParse { message, .. } => {
            assert!(message.contains("number column"));
        }
        other => panic!("Expected TimingParse error, got {:?}", other),
    }
}

#[test]
fn test_empty_race_folder_fails() {
    let temp = TempDir::new().unwrap();
    let mut parser = TimingParser::new(temp.path());
    assert!(parser.parse_all().is_err());
}

#[test]
fn test_linked_passage_time() {
    let temp = TempDir::new().unwrap();
    write_file(temp.path(), "PC1START.csv", "lane,time,number\nA,09:00:00,1\n");
    write_file(temp.path(), "PC3GOAL.csv", "lane,time,number\nA,09:10:30,1\n");

    let mut parser = TimingParser::new(temp.path());
    parser.parse_all().unwrap();

    let elapsed = parser.linked_passage_time(1, "PC1", "PC3").unwrap();
    assert!((elapsed - 630.0).abs() < 1e-9);
}

#[test]
fn test_lane_values_recorded() {
    let temp = TempDir::new().unwrap();
    write_file(
        temp.path(),
        "PC1START.csv",
        "lane,time,number\nT,09:00:00,1\nA,09:01:00,2\n",
    );

    let mut parser = TimingParser::new(temp.path());
    parser.parse_all().unwrap();

    let records = parser.records();
    assert_eq!(records[0].lane.as_deref(), Some("T"));
    assert_eq!(records[1].lane.as_deref(), Some("A"));
}

#[test]
fn test_reparse_is_idempotent() {
    let temp = standard_race_folder();
    let mut parser = TimingParser::new(temp.path());
    parser.parse_all().unwrap();
    let first_records = parser.records().to_vec();
    let first_time = parser.passage_time(2, "PC1");

    parser.parse_all().unwrap();
    assert_eq!(parser.records(), first_records.as_slice());
    assert_eq!(parser.passage_time(2, "PC1"), first_time);
}
