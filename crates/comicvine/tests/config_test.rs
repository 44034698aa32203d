//! Configuration loading tests.

use comicvine::{ClientConfig, ClientConfigBuilder, ComicVineErrorKind};
use std::io::Write;
use std::time::Duration;

#[test]
fn test_from_file_overrides_and_defaults() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
token = "file-key"
base_host = "http://localhost:9999"
upstream_backoff_ms = 0

[cache]
default_ttl_ms = 60000

[limiter]
max_requests_per_second = 2
"#
    )
    .unwrap();

    let config = ClientConfig::from_file(file.path()).unwrap();

    assert_eq!(config.token(), "file-key");
    assert_eq!(config.base_host(), "http://localhost:9999");
    assert_eq!(*config.upstream_backoff_ms(), 0);
    assert_eq!(*config.cache().default_ttl_ms(), 60_000);
    assert_eq!(*config.limiter().max_requests_per_second(), Some(2));

    // Missing keys keep their defaults
    assert_eq!(config.base_path(), "/api");
    assert_eq!(*config.request_timeout_secs(), 30);
    assert_eq!(*config.cache().max_size(), 1000);
    assert!(*config.cache().enabled());
    assert_eq!(*config.limiter().special_reset_floor_ms(), 250);
}

#[test]
fn test_from_file_rejects_malformed_toml() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "token = ").unwrap();

    let err = ClientConfig::from_file(file.path()).unwrap_err();
    assert!(matches!(err.kind(), ComicVineErrorKind::Config(_)));
}

#[test]
fn test_from_file_missing_path() {
    let dir = tempfile::tempdir().unwrap();
    let err = ClientConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err.kind(), ComicVineErrorKind::Config(_)));
}

#[test]
fn test_builder_and_setters() {
    let config = ClientConfigBuilder::default()
        .token("built-key")
        .request_timeout_secs(5u64)
        .build()
        .unwrap()
        .with_cache_ttl(Duration::from_secs(120));

    assert_eq!(config.token(), "built-key");
    assert_eq!(*config.request_timeout_secs(), 5);
    assert_eq!(*config.cache().default_ttl_ms(), 120_000);
    assert_eq!(config.base_url().unwrap(), "https://comicvine.gamespot.com/api");
    assert!(config.validate().is_ok());
}

#[test]
fn test_cache_ttl_keeps_sub_second_precision() {
    let config = ClientConfig::new("key").with_cache_ttl(Duration::from_millis(500));
    assert_eq!(*config.cache().default_ttl_ms(), 500);

    let config = ClientConfig::new("key").with_cache_ttl(Duration::from_millis(1_500));
    assert_eq!(*config.cache().default_ttl_ms(), 1_500);

    let config = ClientConfig::new("key").with_cache_ttl(Duration::from_micros(10));
    assert_eq!(*config.cache().default_ttl_ms(), 1);
}
