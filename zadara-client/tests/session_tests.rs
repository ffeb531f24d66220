//! Integration tests for zadara-client session construction.
//!
//! These tests exercise settings resolution and request building without
//! a running server.

use std::collections::HashMap;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;
use zadara_client::{ApiCall, CallOptions, ClientError, RequestOverride, Session};

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + Send + Sync + 'static {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |name| vars.get(name).cloned()
}

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_explicit_host_wins() {
    let file = config_file("[DEFAULT]\nhost = c.example.com\nkey = FILEKEY\n");

    let session = Session::builder()
        .host("a.example.com")
        .config_file(file.path())
        .env_lookup(env(&[("ZADARA_HOST", "b.example.com")]))
        .build()
        .unwrap();

    assert_eq!(session.host(), "a.example.com");
}

#[test]
fn test_env_host_beats_file() {
    let file = config_file("[DEFAULT]\nhost = c.example.com\nkey = FILEKEY\n");

    let session = Session::builder()
        .config_file(file.path())
        .env_lookup(env(&[("ZADARA_HOST", "b.example.com")]))
        .build()
        .unwrap();

    assert_eq!(session.host(), "b.example.com");
}

#[test]
fn test_file_fills_in_the_rest() {
    let file = config_file("[DEFAULT]\nhost = c.example.com\nkey = FILEKEY\nport = 8443\nsecure = no\n");

    let session = Session::builder()
        .config_file(file.path())
        .env_lookup(env(&[]))
        .build()
        .unwrap();

    assert_eq!(session.host(), "c.example.com");
    assert_eq!(session.port(), Some(8443));
    assert!(!session.secure());
}

#[test]
fn test_no_host_anywhere_fails() {
    let result = Session::builder()
        .key("KEY")
        .no_config_file()
        .env_lookup(env(&[]))
        .build();

    match result {
        Err(ClientError::Config(msg)) => assert!(msg.contains("hostname")),
        other => panic!("Expected Config error, got {other:?}"),
    }
}

#[test]
fn test_no_key_anywhere_fails() {
    let result = Session::builder()
        .host("example.com")
        .no_config_file()
        .env_lookup(env(&[]))
        .build();

    assert!(matches!(result, Err(ClientError::Config(_))));
}

#[test]
fn test_url_construction() {
    let https = Session::new("example.com", "KEY").unwrap();
    let request = https
        .create_api_message(&ApiCall::get("/drives.json"), &CallOptions::default())
        .unwrap();
    assert_eq!(request.url, "https://example.com:443/drives.json");

    let http = Session::builder()
        .host("example.com")
        .key("KEY")
        .port(8080)
        .secure(false)
        .no_config_file()
        .env_lookup(env(&[]))
        .build()
        .unwrap();
    let request = http
        .create_api_message(&ApiCall::get("drives.json"), &CallOptions::default())
        .unwrap();
    assert_eq!(request.url, "http://example.com:8080/drives.json");
}

#[test]
fn test_invalid_host_rejected_at_request_build() {
    let session = Session::new("example.com", "KEY").unwrap();
    let options = CallOptions::default().with_overrides(RequestOverride {
        host: Some("invalid$.hostname.com".into()),
        ..Default::default()
    });

    let result = session.create_api_message(&ApiCall::get("/x"), &options);
    assert!(matches!(result, Err(ClientError::Config(_))));
}

#[test]
fn test_timeouts() {
    let session = Session::new("example.com", "KEY").unwrap();

    let request = session
        .create_api_message(&ApiCall::get("/x"), &CallOptions::default().with_timeout(15))
        .unwrap();
    assert_eq!(request.timeout, Duration::from_secs(20));

    let result = session.create_api_message(&ApiCall::get("/x"), &CallOptions::default().with_timeout(0));
    assert!(matches!(result, Err(ClientError::Config(_))));
}

#[test]
fn test_session_is_shareable() {
    fn assert_send_sync<T: Send + Sync + Clone>() {}
    assert_send_sync::<Session>();
}
