//! End-to-end tests for the `zadarapy` binary against a mock array.

use std::process::{Command, Output};

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn zadarapy(server: Option<&MockServer>, args: &[&str]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_zadarapy"));
    command
        .args(args)
        .env_remove("ZADARA_HOST")
        .env_remove("ZADARA_PORT")
        .env_remove("ZADARA_KEY")
        .env_remove("ZADARA_SECURE")
        .env_remove("RUST_LOG");
    if let Some(server) = server {
        let addr = server.address();
        command.args([
            "-H",
            &addr.ip().to_string(),
            "-p",
            &addr.port().to_string(),
            "-k",
            "TESTKEY",
            "-i",
        ]);
    }
    tokio::task::spawn_blocking(move || command.output().unwrap())
        .await
        .unwrap()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_renders_table() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/raid_groups.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {
                "status": 0,
                "raid_groups": [{"name": "RaidGroup-1", "protection": "RAID1"}]
            }
        })))
        .mount(&server)
        .await;

    let output = zadarapy(Some(&server), &["raid-groups", "list"]).await;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("Count: 1"));
    assert!(out.contains("RaidGroup-1"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_json_output() {
    let body = r#"{"response":{"status":0,"disks":[]}}"#;
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/drives.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let output = zadarapy(Some(&server), &["drives", "list", "-j"]).await;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).trim_end(), body);
}

async fn mount_drives(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/drives.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {
                "status": 0,
                "disks": [
                    {"name": "volume-00000001", "display_name": "ssd-a", "status": "Available"},
                    {"name": "volume-00000002", "display_name": "ssd-b", "status": "In-Use"}
                ]
            }
        })))
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_return_fields_keep_only_named_columns() {
    let server = MockServer::start().await;
    mount_drives(&server).await;

    let output = zadarapy(Some(&server), &["drives", "list", "-r", "name"]).await;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("Count: 2"));
    assert!(out.contains("volume-00000002"));
    assert!(!out.contains("display_name"));
    assert!(!out.contains("In-Use"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_return_fields_matching_nothing_is_empty_result() {
    let server = MockServer::start().await;
    mount_drives(&server).await;

    let output = zadarapy(Some(&server), &["drives", "list", "-r", "bogus"]).await;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "An empty result set was returned");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_vertical_prints_titled_tables() {
    let server = MockServer::start().await;
    mount_drives(&server).await;

    let output = zadarapy(Some(&server), &["drives", "list", "-V"]).await;

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(!out.contains("Count:"));
    let first = out.find("ssd-a").unwrap();
    let second = out.find("ssd-b").unwrap();
    assert!(first < second);
    assert_eq!(out.matches("| status ").count(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_action_reports_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/raid_groups/RaidGroup-1/repair.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {"status": 0}
        })))
        .mount(&server)
        .await;

    let output = zadarapy(
        Some(&server),
        &["raid-groups", "repair", "--raid-id", "RaidGroup-1"],
    )
    .await;

    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "Command returned success");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_api_error_exits_with_runtime_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/pools/pool-00000001.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": {"status": 1, "message": "No such pool"}
        })))
        .mount(&server)
        .await;

    let output = zadarapy(Some(&server), &["pools", "get", "--pool-id", "pool-00000001"]).await;

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains(
        "There was an error at runtime returned by the API: \"The API server returned an error: \"No such pool\".\""
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_id_exits_with_parameter_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let output = zadarapy(Some(&server), &["pools", "get", "--pool-id", "pool-1"]).await;

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains(
        "There was an error with a parameter passed to the API: \"pool-1 is not a valid storage pool ID.\""
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_negative_timeout_rejected() {
    let output = zadarapy(None, &["drives", "list", "--timeout=-5"]).await;

    assert!(!output.status.success());
    assert!(stderr(&output).contains("-5 is an invalid positive int value"));
}
