//! Email relay client tests against a mock HTTP server

use httpmock::prelude::*;
use serde_json::json;
use server_settings::domain::EmailService;
use server_settings::infra::HttpEmailService;
use std::time::Duration;

#[tokio::test]
async fn test_successful_probe() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/test")
                .json_body(json!({ "adminEmail": "admin@example.com", "isDefault": false }));
            then.status(200);
        })
        .await;

    let email = HttpEmailService::new(Duration::from_secs(5));
    let result = email
        .test_connectivity(&server.base_url(), "admin@example.com", false)
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(result.successful);
    assert!(result.error_message.is_none());
}

#[tokio::test]
async fn test_relay_error_is_reported_not_raised() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/test");
            then.status(503).body("relay offline");
        })
        .await;

    let email = HttpEmailService::new(Duration::from_secs(5));
    let url = format!("{}/", server.base_url());
    let result = email
        .test_connectivity(&url, "admin@example.com", true)
        .await
        .unwrap();

    assert!(!result.successful);
    assert_eq!(result.error_message.as_deref(), Some("relay offline"));
}

#[tokio::test]
async fn test_unreachable_relay_is_reported() {
    let email = HttpEmailService::new(Duration::from_millis(500));
    let result = email
        .test_connectivity("http://127.0.0.1:9", "admin@example.com", false)
        .await
        .unwrap();

    assert!(!result.successful);
    assert!(result.error_message.is_some());
}

#[tokio::test]
async fn test_configure_relay_records_endpoint() {
    let email = HttpEmailService::new(Duration::from_secs(5));
    assert!(email.relay_url().is_none());

    email.configure_relay("https://relay.example.com").unwrap();
    assert_eq!(email.relay_url().as_deref(), Some("https://relay.example.com"));
}
