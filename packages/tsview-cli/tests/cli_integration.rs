use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn tsview() -> Command {
    Command::cargo_bin("tsview").unwrap()
}

fn data_file(contents: &str) -> NamedTempFile {
    let mut tmp = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    tmp.write_all(contents.as_bytes()).unwrap();
    tmp.flush().unwrap();
    tmp
}

fn scenario() -> NamedTempFile {
    data_file("1,5\n2,10\n3,-3\n4,7\n")
}

fn path(tmp: &NamedTempFile) -> &str {
    tmp.path().to_str().unwrap()
}

fn stdout_json(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).unwrap()
}

// =============================================================================
// GENERAL
// =============================================================================

#[test]
fn test_no_args_shows_help() {
    tsview()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_version_flag() {
    tsview()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("tsview"));
}

#[test]
fn test_help_flag() {
    tsview()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("x,y"));
}

// =============================================================================
// INFO SUBCOMMAND
// =============================================================================

#[test]
fn test_info_text() {
    let tmp = scenario();
    tsview()
        .args(["info", "--file", path(&tmp)])
        .assert()
        .success()
        .stdout(predicate::str::contains("Points: 4"))
        .stdout(predicate::str::contains("Min: -3"))
        .stdout(predicate::str::contains("Max: 10"));
}

#[test]
fn test_info_json() {
    let tmp = scenario();
    let info = stdout_json(tsview().args(["info", "--file", path(&tmp), "--json", "--block-size", "2"]));

    assert_eq!(info["length"], 4);
    assert_eq!(info["block_size"], 2);
    assert_eq!(info["block_count"], 2);
    assert_eq!(info["first_x"], 1.0);
    assert_eq!(info["last_x"], 4.0);
    assert_eq!(info["stats"]["avg"], 4.75);
}

#[test]
fn test_info_nonexistent_file() {
    tsview()
        .args(["info", "--file", "/nonexistent/series.csv"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not found"));
}

// =============================================================================
// STATS SUBCOMMAND
// =============================================================================

#[test]
fn test_stats_whole_series() {
    let tmp = scenario();
    let stats = stdout_json(tsview().args(["stats", "--file", path(&tmp), "--block-size", "2"]));

    assert_eq!(stats["count"], 4);
    assert_eq!(stats["min"], -3.0);
    assert_eq!(stats["max"], 10.0);
    assert_eq!(stats["sum"], 19.0);
    assert_eq!(stats["sum_sq"], 183.0);
    assert_eq!(stats["mean"], 4.75);
}

#[test]
fn test_stats_sub_range_crossing_blocks() {
    let tmp = scenario();
    let stats = stdout_json(tsview().args([
        "stats",
        "--file",
        path(&tmp),
        "--block-size",
        "2",
        "--start",
        "1",
        "--end",
        "2",
    ]));

    assert_eq!(stats["count"], 2);
    assert_eq!(stats["min"], -3.0);
    assert_eq!(stats["max"], 10.0);
    assert_eq!(stats["sum"], 7.0);
}

#[test]
fn test_stats_empty_range_reports_nulls() {
    let tmp = scenario();
    let stats = stdout_json(tsview().args(["stats", "--file", path(&tmp), "--start", "3", "--end", "1"]));

    assert_eq!(stats["count"], 0);
    assert!(stats["min"].is_null());
    assert!(stats["max"].is_null());
    assert!(stats["mean"].is_null());
}

#[test]
fn test_stats_written_to_file() {
    let tmp = scenario();
    let out = tempfile::Builder::new().suffix(".json").tempfile().unwrap();

    tsview()
        .args(["stats", "--file", path(&tmp), "--compact", "-o", path(&out)])
        .assert()
        .success();

    let written = std::fs::read_to_string(out.path()).unwrap();
    assert!(written.contains("\"sum\":19.0"));
}

// =============================================================================
// VIEW SUBCOMMAND
// =============================================================================

#[test]
fn test_view_passthrough() {
    let tmp = scenario();
    let view = stdout_json(tsview().args(["view", "--file", path(&tmp)]));

    assert_eq!(view["length"], 4);
    assert_eq!(view["downsampled"], false);
    assert_eq!(view["window"]["start"], 0);
    assert_eq!(view["window"]["len"], 4);
    assert_eq!(view["projection"]["low"], serde_json::json!([5.0, 10.0, -3.0, 7.0]));
}

#[test]
fn test_view_downsampled() {
    let tmp = scenario();
    let view = stdout_json(tsview().args(["view", "--file", path(&tmp), "--width", "2", "--block-size", "2"]));

    assert_eq!(view["downsampled"], true);
    assert_eq!(view["projection"]["x"], serde_json::json!([1.0, 3.0]));
    assert_eq!(view["projection"]["low"], serde_json::json!([5.0, -3.0]));
    assert_eq!(view["projection"]["high"], serde_json::json!([10.0, 7.0]));
    assert_eq!(view["projection"]["mean"], serde_json::json!([7.5, 2.0]));
}

#[test]
fn test_view_clamps_negative_start() {
    let tmp = scenario();
    let view = stdout_json(tsview().args(["view", "--file", path(&tmp), "--start", "-5", "--size", "2"]));

    assert_eq!(view["window"]["start"], 0);
    assert_eq!(view["window"]["len"], 2);
    assert_eq!(view["stats"]["min"], 5.0);
    assert_eq!(view["stats"]["max"], 10.0);
}

#[test]
fn test_view_stats_only() {
    let tmp = scenario();
    let view = stdout_json(tsview().args(["view", "--file", path(&tmp), "--stats-only", "--start", "2"]));

    assert!(view.get("projection").is_none());
    assert_eq!(view["window"]["start"], 2);
    assert_eq!(view["window"]["len"], 2);
    assert_eq!(view["stats"]["avg"], 2.0);
    assert_eq!(view["stats"]["variance"], 25.0);
}

#[test]
fn test_view_skips_malformed_lines() {
    let tmp = data_file("header,row\n1,2\n\nnot a number\n2,4,extra\n3,abc\n4,8");
    let view = stdout_json(tsview().args(["view", "--file", path(&tmp)]));

    assert_eq!(view["length"], 3);
    assert_eq!(view["projection"]["x"], serde_json::json!([1.0, 2.0, 4.0]));
}

#[test]
fn test_view_empty_file() {
    let tmp = data_file("");
    let view = stdout_json(tsview().args(["view", "--file", path(&tmp)]));

    assert_eq!(view["length"], 0);
    assert!(view.get("window").is_none());
}

#[test]
fn test_view_config_file_with_flag_override() {
    let tmp = scenario();
    let mut config = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(config, r#"{{"window_start": 1, "window_size": 2, "output_width": 1}}"#).unwrap();

    let view = stdout_json(tsview().args([
        "view",
        "--file",
        path(&tmp),
        "--config",
        config.path().to_str().unwrap(),
        "--width",
        "10",
    ]));

    assert_eq!(view["window"]["start"], 1);
    assert_eq!(view["window"]["len"], 2);
    assert_eq!(view["output_width"], 10);
    assert_eq!(view["downsampled"], false);
}

#[test]
fn test_view_invalid_config_file() {
    let tmp = scenario();
    let config = data_file("{ not json");

    tsview()
        .args(["view", "--file", path(&tmp), "--config", path(&config)])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid config file"));
}

#[test]
fn test_width_from_environment() {
    let tmp = scenario();
    let view = stdout_json(
        tsview()
            .env("TSVIEW_WIDTH", "2")
            .args(["view", "--file", path(&tmp)]),
    );
    assert_eq!(view["projection"]["x"], serde_json::json!([1.0, 3.0]));
}

// =============================================================================
// PLAY SUBCOMMAND
// =============================================================================

#[test]
fn test_play_runs_to_end() {
    let tmp = data_file(&(0..10).map(|i| format!("{},{}\n", i, i)).collect::<String>());

    let output = tsview()
        .args([
            "play",
            "--file",
            path(&tmp),
            "--size",
            "3",
            "--step",
            "4",
            "--interval-ms",
            "1",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let frames: Vec<serde_json::Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert!(!frames.is_empty());
    let last = frames.last().unwrap();
    assert_eq!(last["window"]["start"], 9);
    assert_eq!(last["window"]["len"], 1);
    assert!(last.get("projection").is_none());
}

#[test]
fn test_play_max_frames() {
    let tmp = data_file(&(0..10_000).map(|i| format!("{},{}\n", i, i % 17)).collect::<String>());

    let output = tsview()
        .args([
            "play",
            "--file",
            path(&tmp),
            "--size",
            "100",
            "--step",
            "1",
            "--interval-ms",
            "50",
            "--max-frames",
            "3",
            "--with-projection",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let text = String::from_utf8(output).unwrap();
    let frames: Vec<serde_json::Value> = text.lines().map(|l| serde_json::from_str(l).unwrap()).collect();
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0]["tick"], 0);
    assert_eq!(frames[0]["window"]["start"], 0);
    assert!(frames[0]["projection"]["x"].is_array());
}

#[test]
fn test_play_zero_max_frames_prints_nothing() {
    let tmp = scenario();
    tsview()
        .args([
            "play",
            "--file",
            path(&tmp),
            "--interval-ms",
            "1",
            "--max-frames",
            "0",
        ])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_play_empty_file_prints_nothing() {
    let tmp = data_file("garbage only\n");
    tsview()
        .args(["play", "--file", path(&tmp), "--interval-ms", "1"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

// =============================================================================
// VALIDATE SUBCOMMAND
// =============================================================================

#[test]
fn test_validate_nonexistent_file() {
    tsview()
        .args(["validate", "--file", "/nonexistent/series.csv"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_validate_valid_file() {
    let tmp = scenario();
    tsview()
        .args(["validate", "--file", path(&tmp)])
        .assert()
        .success()
        .stdout(predicate::str::contains("valid"))
        .stdout(predicate::str::contains("4 records"));
}

#[test]
fn test_validate_file_without_records() {
    let tmp = data_file("a,b\nc,d\n");
    tsview()
        .args(["validate", "--file", path(&tmp)])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No valid x,y records"));
}

#[test]
fn test_validate_json_output() {
    let tmp = scenario();
    let result = stdout_json(tsview().args(["validate", "--file", path(&tmp), "--json"]));

    assert_eq!(result["exists"], true);
    assert_eq!(result["readable"], true);
    assert_eq!(result["records"], 4);
    assert!(result["error"].is_null());
}

// =============================================================================
// ARGUMENT ERRORS
// =============================================================================

#[test]
fn test_missing_file_arg() {
    tsview()
        .arg("view")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--file"));
}

#[test]
fn test_invalid_block_size_value() {
    let tmp = scenario();
    tsview()
        .args(["info", "--file", path(&tmp), "--block-size", "lots"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}
