use std::time::Duration;

use anyhow::Result;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use thiserror::Error;
use tracing::error;

/// Errors surfaced by the payment-provider gateway. `Unavailable` is
/// transient: the caller must leave the transaction retryable rather than
/// finalizing it.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("payment gateway is unreachable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result of validating a receipt against the provider.
#[derive(Debug, Clone)]
pub struct CaptureOutcome {
    pub paid: bool,
    pub reason_code: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GatewayClientConfig {
    pub base_url: String,
    pub client_key: String,
    pub client_secret: String,
    pub timeout_secs: u64,
}

/// Minimal payment-provider client built on reqwest.
pub struct GatewayClient {
    http: reqwest::Client,
    base_url: String,
    client_key: String,
    client_secret: String,
}

#[derive(Debug, Deserialize)]
struct ReceiptResponse {
    status: String,
    reason_code: Option<String>,
}

impl GatewayClient {
    pub fn new(config: GatewayClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client_key: config.client_key,
            client_secret: config.client_secret,
        })
    }

    /// URL of the provider's hosted payment page for the payment; the
    /// provider redirects back to `return_url` once the payer is done.
    pub fn hosted_payment_url(&self, payment_id: i64, return_url: &str) -> String {
        format!(
            "{}/web/payments/{}?redirect_uri={}",
            self.base_url, payment_id, return_url
        )
    }

    /// Validates a receipt with the provider. Connection failures and
    /// timeouts map to `GatewayError::Unavailable`; an answered-but-declined
    /// receipt is a normal outcome with `paid = false`.
    pub async fn capture(&self, receipt_number: &str) -> Result<CaptureOutcome, GatewayError> {
        let resp = self
            .http
            .get(format!("{}/api/receipts/{}", self.base_url, receipt_number))
            .basic_auth(&self.client_key, Some(&self.client_secret))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() || err.is_connect() {
                    GatewayError::Unavailable(err.to_string())
                } else {
                    GatewayError::Other(err.into())
                }
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            error!(
                status = %status,
                response_body = %body,
                receipt_number,
                "gateway receipt lookup rejected"
            );
            return Ok(CaptureOutcome {
                paid: false,
                reason_code: Some(format!("HTTP_{}", status.as_u16())),
            });
        }

        let parsed: ReceiptResponse = resp
            .json()
            .await
            .map_err(|err| GatewayError::Other(err.into()))?;

        Ok(CaptureOutcome {
            paid: parsed.status.eq_ignore_ascii_case("PAID"),
            reason_code: parsed.reason_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> GatewayClient {
        GatewayClient::new(GatewayClientConfig {
            base_url: "https://gateway.example/".to_string(),
            client_key: "key".to_string(),
            client_secret: "secret".to_string(),
            timeout_secs: 10,
        })
        .unwrap()
    }

    #[test]
    fn hosted_payment_url_strips_trailing_slash_and_appends_redirect() {
        let url = client().hosted_payment_url(42, "https://client.example/done");
        assert_eq!(
            url,
            "https://gateway.example/web/payments/42?redirect_uri=https://client.example/done"
        );
    }
}
