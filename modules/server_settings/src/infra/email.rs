//! HTTP client for the outbound email relay

use crate::contract::EmailTestResult;
use crate::domain::EmailService;
use anyhow::{Context, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TestRequest<'a> {
    admin_email: &'a str,
    is_default: bool,
}

struct Relay {
    url: String,
    client: reqwest::Client,
}

/// [`EmailService`] talking to the relay over HTTPS
pub struct HttpEmailService {
    timeout: Duration,
    relay: RwLock<Option<Relay>>,
}

impl HttpEmailService {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            relay: RwLock::new(None),
        }
    }

    /// Endpoint the relay client currently points at
    pub fn relay_url(&self) -> Option<String> {
        self.relay.read().as_ref().map(|r| r.url.clone())
    }

    // Self-hosted relays commonly run with self-signed certificates
    fn build_client(&self) -> Result<reqwest::Client> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .danger_accept_invalid_certs(true)
            .build()
            .context("failed to build email relay client")
    }

    fn client(&self) -> Result<reqwest::Client> {
        match self.relay.read().as_ref() {
            Some(relay) => Ok(relay.client.clone()),
            None => self.build_client(),
        }
    }
}

#[async_trait]
impl EmailService for HttpEmailService {
    async fn test_connectivity(
        &self,
        email_url: &str,
        admin_email: &str,
        is_default: bool,
    ) -> Result<EmailTestResult> {
        let client = self.client()?;
        let endpoint = format!("{}/api/test", email_url.trim_end_matches('/'));
        debug!(%endpoint, is_default, "Testing email relay");

        let response = client
            .post(&endpoint)
            .json(&TestRequest {
                admin_email,
                is_default,
            })
            .send()
            .await;

        let result = match response {
            Ok(resp) if resp.status().is_success() => EmailTestResult {
                successful: true,
                error_message: None,
            },
            Ok(resp) => {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                let message = if body.trim().is_empty() {
                    format!("relay responded with {status}")
                } else {
                    body
                };
                EmailTestResult {
                    successful: false,
                    error_message: Some(message),
                }
            }
            Err(e) => EmailTestResult {
                successful: false,
                error_message: Some(e.to_string()),
            },
        };
        Ok(result)
    }

    fn configure_relay(&self, email_url: &str) -> Result<()> {
        let client = self.build_client()?;
        *self.relay.write() = Some(Relay {
            url: email_url.to_string(),
            client,
        });
        info!(url = %email_url, "Email relay configured");
        Ok(())
    }
}
