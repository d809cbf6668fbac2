//! End-to-end conversion tests
//!
//! Tests cover:
//! - Input discovery and ordering
//! - Row counts and token prefixes across files
//! - Idempotence of repeated runs
//! - Failure policy for unreadable inputs

use crate::common::assertions::*;
use crate::common::synthetic::*;
use crate::common::{read_output_file, write_input};
use gsdconv::{convert_files, discover_inputs, run, ConvertSettings};
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

fn settings_for(root: &Path) -> ConvertSettings {
    ConvertSettings {
        input_dir: root.join("data"),
        output_dir: root.join("output"),
        ..ConvertSettings::default()
    }
}

fn workspace() -> (TempDir, ConvertSettings) {
    let dir = tempdir().unwrap();
    let settings = settings_for(dir.path());
    std::fs::create_dir_all(&settings.input_dir).unwrap();
    (dir, settings)
}

// ============================================
// Discovery Tests
// ============================================

#[test]
fn test_discover_sorted_and_filtered() {
    let (_dir, settings) = workspace();
    write_input(&settings.input_dir, "b.gsd", "");
    write_input(&settings.input_dir, "a.gsd", "");
    write_input(&settings.input_dir, "c.txt", "");
    std::fs::create_dir(settings.input_dir.join("d.gsd")).unwrap();

    let inputs = discover_inputs(&settings.input_dir, &settings.pattern).unwrap();
    let names: Vec<String> = inputs
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(names, vec!["a.gsd", "b.gsd"]);
}

#[test]
fn test_discover_invalid_pattern() {
    let (_dir, settings) = workspace();
    let err = discover_inputs(&settings.input_dir, "[").unwrap_err();
    assert!(err.to_string().contains("Invalid input pattern"));
}

// ============================================
// Run Tests
// ============================================

#[test]
fn test_run_combines_files_in_sorted_order() {
    let (_dir, settings) = workspace();
    write_input(
        &settings.input_dir,
        "2.gsd",
        &format!("{}\n{}\n", header(2, "2024-01-02:00:00:00"), record_line(2, "5530", "1230", "83000", "1234")),
    );
    write_input(
        &settings.input_dir,
        "1.gsd",
        &format!("{}\n{}\n", header(1, "2024-01-01:00:00:00"), record_line(1, "5530", "1230", "83000", "1234")),
    );

    let summary = run(&settings).unwrap();
    assert_eq!(summary.files.len(), 2);
    assert!(summary.wrote_header);

    let csv = read_output_file(&settings.output_path());
    assert_single_header(&csv);
    let rows = data_rows(&csv);
    assert_eq!(rows.len(), 2);
    assert!(rows[0].starts_with("1,2024-01-01:00:00:00,"));
    assert!(rows[1].starts_with("2,2024-01-02:00:00:00,"));
}

#[test]
fn test_row_count_matches_accepted_lines() {
    let (_dir, settings) = workspace();
    let noisy = format!(
        "preamble=ignored\n{}\n{}\nnot data\n\n{}\n{}\n{}\n",
        header(1, "2024-01-01:00:00:00"),
        data_line(&["1", "2"]),
        header(2, "2024-01-01:00:00:01"),
        header(3, "2024-01-01:00:00:02"),
        record_line(1, "5530", "1230", "83000", "1234"),
    );
    write_input(&settings.input_dir, "a.gsd", &noisy);
    write_input(&settings.input_dir, "b.gsd", &gsd_file(4, 5));

    let summary = run(&settings).unwrap();
    assert_eq!(summary.total_rows(), 2 + 20);
    assert_eq!(summary.total_parse().data_lines, 22);
    assert_eq!(summary.total_parse().empty_blocks, 1);

    let csv = read_output_file(&settings.output_path());
    let rows = data_rows(&csv);
    assert_eq!(rows.len(), 22);
    assert_rows_prefixed(
        &rows,
        &[
            "1,2024-01-01:00:00:00",
            "3,2024-01-01:00:00:02",
            "2,2024-01-01:00:01:00",
            "3,2024-01-01:00:02:00",
            "4,2024-01-01:00:03:00",
        ],
    );
}

#[test]
fn test_example_scenario_block() {
    let (_dir, settings) = workspace();
    write_input(
        &settings.input_dir,
        "scenario.gsd",
        "[7,2024-01-01:00:00:00]\nTRAIL_ID=1=Y_COORDINA=5530000=X_COORDINA=1245000=TIME_ORIGINAL=083000=DATE_ORIGINAL=20240101=SPEED=1234=HEIGHT=10\n",
    );

    run(&settings).unwrap();
    let csv = read_output_file(&settings.output_path());
    let rows = data_rows(&csv);
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0],
        "7,2024-01-01:00:00:00,TRAIL_ID,1,,Y_COORDINA,,5530000,X_COORDINA,,12450.00,TIME_ORIGINAL,083000,DATE_ORIGINAL,20240101,SPEED,1234,HEIGHT,10"
    );
}

#[test]
fn test_cr_only_file_converts_every_row() {
    let (_dir, settings) = workspace();
    write_input(
        &settings.input_dir,
        "cr.gsd",
        "[7,2024-01-01:00:00:00]\r1=5530=1230=83000=20240101=1234=10\r2=5531=1231=83001=20240101=1235=11\r",
    );

    let summary = run(&settings).unwrap();
    assert_eq!(summary.total_rows(), 2);

    let csv = read_output_file(&settings.output_path());
    assert_single_header(&csv);
    let rows = data_rows(&csv);
    assert_eq!(
        rows,
        vec![
            "7,2024-01-01:00:00:00,1,5530,55.5000000,1230,12.5000000,83000,20240101,08:30:00,12.34,10",
            "7,2024-01-01:00:00:00,2,5531,55.5166667,1231,12.5166667,83001,20240101,08:30:01,12.35,11",
        ]
    );
}

#[test]
fn test_run_is_idempotent() {
    let (_dir, settings) = workspace();
    write_input(&settings.input_dir, "a.gsd", &gsd_file(3, 3));
    write_input(&settings.input_dir, "b.gsd", &gsd_file(2, 7));

    run(&settings).unwrap();
    let first = std::fs::read(settings.output_path()).unwrap();
    run(&settings).unwrap();
    let second = std::fs::read(settings.output_path()).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_empty_input_writes_header_only() {
    let (_dir, settings) = workspace();
    write_input(&settings.input_dir, "empty.gsd", "");

    let summary = run(&settings).unwrap();
    assert_eq!(summary.total_rows(), 0);

    let csv = read_output_file(&settings.output_path());
    assert_eq!(csv, format!("{}\n", gsdconv::record::header_line()));
}

#[test]
fn test_missing_input_dir_writes_header_only() {
    let dir = tempdir().unwrap();
    let settings = settings_for(dir.path());

    let summary = run(&settings).unwrap();
    assert!(summary.files.is_empty());
    assert_single_header(&read_output_file(&settings.output_path()));
}

// ============================================
// Failure Policy Tests
// ============================================

#[test]
fn test_unreadable_input_aborts_by_default() {
    let (_dir, settings) = workspace();
    let good = write_input(&settings.input_dir, "a.gsd", &gsd_file(1, 1));
    let inputs = vec![good, PathBuf::from("missing.gsd")];

    let mut sink = Vec::new();
    let err = convert_files(&inputs, &mut sink, false).unwrap_err();
    assert!(err.is_input_error());
    // rows of the first file were already written
    assert_eq!(String::from_utf8(sink).unwrap().lines().count(), 1);
}

#[test]
fn test_unreadable_input_skipped_when_configured() {
    let (_dir, settings) = workspace();
    let good = write_input(&settings.input_dir, "a.gsd", &gsd_file(1, 2));
    let inputs = vec![PathBuf::from("missing.gsd"), good];

    let mut sink = Vec::new();
    let summary = convert_files(&inputs, &mut sink, true).unwrap();
    assert_eq!(summary.skipped, vec![PathBuf::from("missing.gsd")]);
    assert_eq!(summary.total_rows(), 2);
}
