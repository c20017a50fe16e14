//! Integration tests for the `validate` command.

mod common;

use std::net::TcpListener;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_validate_reachable_host_writes_report() {
    let env = TestEnv::new();
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    let reports = env.path().join("reports");

    env.command()
        .arg("validate")
        .arg("127.0.0.1")
        .arg("--port")
        .arg(port.to_string())
        .arg("--timeout")
        .arg("2")
        .arg("--reports-dir")
        .arg(&reports)
        .assert()
        .success()
        .stderr(predicate::str::contains("READY"));

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(reports.join("127.0.0.1.json")).unwrap())
            .unwrap();
    assert_eq!(report["ip"], "127.0.0.1");
    assert_eq!(report["status"], "READY");
    assert!(report["timestamp"].as_str().unwrap().ends_with('Z'));
}

#[test]
fn test_validate_unreachable_host_fails() {
    let env = TestEnv::new();
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    env.command()
        .args(["validate", "127.0.0.1", "--timeout", "1", "--port"])
        .arg(port.to_string())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("validation failed for 127.0.0.1"));

    assert!(!env.path().join("reports").exists());
}

#[test]
fn test_validate_rejects_bad_input() {
    let env = TestEnv::new();

    env.command()
        .args(["validate", "not-an-ip"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid address"));

    env.command()
        .args(["validate", "127.0.0.1", "--timeout", "0"])
        .assert()
        .code(4);
}
