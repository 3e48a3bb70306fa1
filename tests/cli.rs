use assert_cmd::prelude::*;
use predicates::str::contains;
use std::process::Command;

#[test]
fn summary_lists_three_wedges() {
    let mut cmd = Command::cargo_bin("radar-pie").expect("binary exists");
    cmd.arg("--summary-only").arg("--segments").arg("3");
    cmd.assert()
        .success()
        .stdout(contains("Radar with 3 segment(s), background #999999, 1 light(s), 1 grid(s):"))
        .stdout(contains(" - wedge 0 span=[0.0, 120.0) depth=0 hue=0.000 color=#ff0000"))
        .stdout(contains(" - wedge 1 span=[120.0, 240.0) depth=1 hue=137.508 color=#00ff4a"))
        .stdout(contains(" - wedge 2 span=[240.0, 360.0) depth=2 hue=275.016 color=#9500ff"));
}

#[test]
fn summary_defaults_to_five_wedges() {
    let mut cmd = Command::cargo_bin("radar-pie").expect("binary exists");
    cmd.arg("--summary-only");
    cmd.assert()
        .success()
        .stdout(contains("Radar with 5 segment(s)"))
        .stdout(contains(" - wedge 4 "));
}

#[test]
fn json_summary_parses() {
    let mut cmd = Command::cargo_bin("radar-pie").expect("binary exists");
    let output = cmd
        .args(["--summary-only", "--json", "--segments", "4"])
        .output()
        .expect("binary runs");
    assert!(output.status.success());
    let report: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout is JSON");
    assert_eq!(report["segments"], 4);
    assert_eq!(report["wedges"].as_array().map(Vec::len), Some(4));
    assert_eq!(report["wedges"][0]["color"], "#ff0000");
}

#[test]
fn out_of_range_segments_fail() {
    for value in ["0", "26"] {
        let mut cmd = Command::cargo_bin("radar-pie").expect("binary exists");
        cmd.args(["--summary-only", "--segments", value]);
        cmd.assert().failure();
    }
}
