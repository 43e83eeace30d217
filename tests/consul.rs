//! Consul fetcher against a mock KV endpoint.

use std::time::Duration;

use hotcfg::{ConfigError, ConfigStore, ConsulFetcher, FetchError, RemoteFetcher};

mod common;

#[tokio::test]
async fn test_fetch_existing_key() {
    let (addr, kv) = common::start_mock_consul().await;
    kv.lock()
        .unwrap()
        .insert("service/config".into(), r#"{"test_int":5}"#.into());

    let fetcher = ConsulFetcher::new(&addr.to_string(), Duration::from_secs(2)).unwrap();
    let value = fetcher.fetch("service/config").await.unwrap();
    assert_eq!(value, r#"{"test_int":5}"#);
}

#[tokio::test]
async fn test_empty_value_is_not_absent() {
    let (addr, kv) = common::start_mock_consul().await;
    kv.lock().unwrap().insert("service/config".into(), String::new());

    let fetcher = ConsulFetcher::new(&addr.to_string(), Duration::from_secs(2)).unwrap();
    assert_eq!(fetcher.fetch("service/config").await.unwrap(), "");
}

#[tokio::test]
async fn test_missing_key_is_key_absent() {
    let (addr, _kv) = common::start_mock_consul().await;

    let fetcher = ConsulFetcher::new(&addr.to_string(), Duration::from_secs(2)).unwrap();
    match fetcher.fetch("service/missing").await {
        Err(FetchError::KeyAbsent(key)) => assert_eq!(key, "service/missing"),
        other => panic!("expected KeyAbsent, got {:?}", other),
    }
}

#[tokio::test]
async fn test_server_error_is_transport() {
    let addr = common::start_programmable_backend(|_| (503, "Service Unavailable".into())).await;

    let fetcher = ConsulFetcher::new(&addr.to_string(), Duration::from_secs(2)).unwrap();
    let err = fetcher.fetch("service/config").await.unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)));
    assert!(err.to_string().contains("503"));
}

#[tokio::test]
async fn test_unreachable_agent_is_transport() {
    let addr = common::unused_addr().await;

    let fetcher = ConsulFetcher::new(&addr.to_string(), Duration::from_secs(2)).unwrap();
    assert!(matches!(
        fetcher.fetch("service/config").await,
        Err(FetchError::Transport(_))
    ));
}

#[tokio::test]
async fn test_load_remote_publishes_value() {
    let (addr, kv) = common::start_mock_consul().await;
    kv.lock()
        .unwrap()
        .insert("service/config".into(), r#"{"test_string":"zaphod"}"#.into());

    let store = ConfigStore::new();
    let fetcher = ConsulFetcher::new(&addr.to_string(), Duration::from_secs(2)).unwrap();
    store.load_remote(&fetcher, "service/config").await.unwrap();
    assert_eq!(store.get_string("test_string"), "zaphod");

    kv.lock()
        .unwrap()
        .insert("service/config".into(), "not valid json".into());
    let err = store.load_remote(&fetcher, "service/config").await.unwrap_err();
    assert!(err.is_invalid_config());
    assert_eq!(store.get_string("test_string"), "zaphod");

    kv.lock().unwrap().remove("service/config");
    assert!(matches!(
        store.load_remote(&fetcher, "service/config").await,
        Err(ConfigError::Fetch(FetchError::KeyAbsent(_)))
    ));
}
