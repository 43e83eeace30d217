//! `hotcfg-cli` exit status against a mock KV endpoint.

use tokio::process::Command;

mod common;

const CLI: &str = env!("CARGO_BIN_EXE_hotcfg-cli");

async fn fetch(address: &str, key: &str) -> std::process::Output {
    Command::new(CLI)
        .args(["fetch", "--address", address, "--key", key, "--timeout-secs", "2"])
        .output()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_fetch_valid_value_succeeds() {
    let (addr, kv) = common::start_mock_consul().await;
    kv.lock()
        .unwrap()
        .insert("service/config".into(), r#"{"test_int":5}"#.into());

    let output = fetch(&addr.to_string(), "service/config").await;
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("\"test_int\": 5"));
}

#[tokio::test]
async fn test_fetch_invalid_value_fails() {
    let (addr, kv) = common::start_mock_consul().await;
    kv.lock()
        .unwrap()
        .insert("service/config".into(), "not valid json".into());

    let output = fetch(&addr.to_string(), "service/config").await;
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not valid json"));
}

#[tokio::test]
async fn test_fetch_missing_key_fails() {
    let (addr, _kv) = common::start_mock_consul().await;

    let output = fetch(&addr.to_string(), "service/missing").await;
    assert!(!output.status.success());
}
