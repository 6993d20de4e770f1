//! HTTP client for the external payment gateway.
//!
//! Wire protocol: `POST {base}/api/debts` registers a debt and returns a
//! transaction reference plus card-redirect and/or QR handles;
//! `GET {base}/api/debts/{reference}` reports the current status.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{DebtRegistration, DebtRequest, PaymentGateway, parse_gateway_status};
use crate::domain::PaymentState;
use crate::error::BookingError;

/// reqwest-backed [`PaymentGateway`] implementation.
#[derive(Debug, Clone)]
pub struct HttpPaymentGateway {
    client: reqwest::Client,
    base_url: String,
}

/// Request body for `POST /api/debts`.
#[derive(Debug, Serialize)]
struct RegisterDebtBody<'a> {
    amount: i64,
    description: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    client_email: Option<&'a str>,
}

/// Response body for `POST /api/debts`.
#[derive(Debug, Deserialize)]
struct DebtResponseBody {
    reference: String,
    #[serde(default)]
    redirect_url: Option<String>,
    #[serde(default)]
    qr_url: Option<String>,
    #[serde(default)]
    status: Option<String>,
}

/// Response body for `GET /api/debts/{reference}`.
#[derive(Debug, Deserialize)]
struct StatusResponseBody {
    status: String,
}

impl HttpPaymentGateway {
    /// Creates a client for the gateway at `base_url` with the given
    /// request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::Gateway`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, BookingError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| BookingError::Gateway(format!("client construction failed: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn register_debt(
        &self,
        request: &DebtRequest,
    ) -> Result<DebtRegistration, BookingError> {
        let url = format!("{}/api/debts", self.base_url);
        let body = RegisterDebtBody {
            amount: request.amount,
            description: &request.description,
            client_email: request.client_email.as_deref(),
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| BookingError::Gateway(format!("debt registration failed: {e}")))?;

        if !response.status().is_success() {
            return Err(BookingError::Gateway(format!(
                "debt registration returned {}",
                response.status()
            )));
        }

        let parsed: DebtResponseBody = response
            .json()
            .await
            .map_err(|e| BookingError::Gateway(format!("malformed gateway response: {e}")))?;

        Ok(DebtRegistration {
            external_ref: parsed.reference,
            redirect_url: parsed.redirect_url,
            qr_url: parsed.qr_url,
            initial_status: parsed
                .status
                .as_deref()
                .map_or(PaymentState::Pending, parse_gateway_status),
        })
    }

    async fn fetch_status(&self, external_ref: &str) -> Result<PaymentState, BookingError> {
        let url = format!("{}/api/debts/{external_ref}", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| BookingError::Gateway(format!("status lookup failed: {e}")))?;

        if !response.status().is_success() {
            return Err(BookingError::Gateway(format!(
                "status lookup returned {}",
                response.status()
            )));
        }

        let parsed: StatusResponseBody = response
            .json()
            .await
            .map_err(|e| BookingError::Gateway(format!("malformed gateway response: {e}")))?;

        Ok(parse_gateway_status(&parsed.status))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn register_debt_parses_handles() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/debts"))
            .and(body_partial_json(serde_json::json!({ "amount": 10_000 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "reference": "gw-abc",
                "redirect_url": "https://gateway.test/pay/gw-abc",
                "qr_url": "https://gateway.test/qr/gw-abc.png",
                "status": "pending"
            })))
            .mount(&server)
            .await;

        let Ok(gateway) = HttpPaymentGateway::new(&server.uri(), 5) else {
            panic!("gateway construction failed");
        };
        let result = gateway
            .register_debt(&DebtRequest {
                amount: 10_000,
                description: "Court 5, 2024-06-01 14:00".to_string(),
                client_email: Some("client@example.com".to_string()),
            })
            .await;

        let Ok(registration) = result else {
            panic!("registration failed");
        };
        assert_eq!(registration.external_ref, "gw-abc");
        assert!(registration.redirect_url.is_some());
        assert!(registration.qr_url.is_some());
        assert_eq!(registration.initial_status, PaymentState::Pending);
    }

    #[tokio::test]
    async fn register_debt_maps_5xx_to_gateway_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/debts"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let Ok(gateway) = HttpPaymentGateway::new(&server.uri(), 5) else {
            panic!("gateway construction failed");
        };
        let result = gateway
            .register_debt(&DebtRequest {
                amount: 100,
                description: "test".to_string(),
                client_email: None,
            })
            .await;

        assert!(matches!(result, Err(BookingError::Gateway(_))));
    }

    #[tokio::test]
    async fn fetch_status_parses_paid() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/debts/gw-abc"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "status": "approved" })),
            )
            .mount(&server)
            .await;

        let Ok(gateway) = HttpPaymentGateway::new(&server.uri(), 5) else {
            panic!("gateway construction failed");
        };
        let result = gateway.fetch_status("gw-abc").await;
        assert!(matches!(result, Ok(PaymentState::Paid)));
    }

    #[tokio::test]
    async fn fetch_status_unknown_reference_is_gateway_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/debts/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let Ok(gateway) = HttpPaymentGateway::new(&server.uri(), 5) else {
            panic!("gateway construction failed");
        };
        let result = gateway.fetch_status("missing").await;
        assert!(matches!(result, Err(BookingError::Gateway(_))));
    }
}
