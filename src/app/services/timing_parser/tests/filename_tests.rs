//! Tests for filename-driven section/event inference

use crate::app::models::Leg;
use crate::app::services::timing_parser::filename::{filename_tokens, infer_section_events};

#[test]
fn test_single_endpoint() {
    let events = infer_section_events("PC1START");
    assert_eq!(events, vec![("PC1".to_string(), Leg::Start)]);
}

#[test]
fn test_combined_goal_and_start() {
    let events = infer_section_events("PC3GOAL_PC4START");
    assert_eq!(
        events,
        vec![
            ("PC3".to_string(), Leg::Goal),
            ("PC4".to_string(), Leg::Start),
        ]
    );
}

#[test]
fn test_non_matching_parts_ignored() {
    let events = infer_section_events("day1_PC2GOAL_notes");
    assert_eq!(events, vec![("PC2".to_string(), Leg::Goal)]);
}

#[test]
fn test_no_endpoint_at_all() {
    assert!(infer_section_events("readme").is_empty());
    assert!(infer_section_events("").is_empty());
}

#[test]
fn test_pattern_requires_trailing_digits() {
    // A bare section name without START/GOAL carries no event
    assert!(infer_section_events("PC1").is_empty());
    // Lowercase section names do not match
    assert!(infer_section_events("pc1start").is_empty());
}

#[test]
fn test_multi_letter_section_names() {
    let events = infer_section_events("CO12GOAL");
    assert_eq!(events, vec![("CO12".to_string(), Leg::Goal)]);
}

#[test]
fn test_filename_tokens() {
    assert_eq!(
        filename_tokens("PC3GOAL_PC4START"),
        vec!["PC3GOAL", "PC4START"]
    );
    assert_eq!(filename_tokens("PC3GOAL"), vec!["PC3GOAL"]);
    assert!(filename_tokens("").is_empty());
}
