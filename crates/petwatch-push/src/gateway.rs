//! HTTP push gateway transport.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use tracing::{debug, warn};

use petwatch_core::config::PushConfig;
use petwatch_entity::push::{PushMessage, PushSubscription};

use crate::transport::{PushOutcome, PushTransport};

/// Error type for gateway setup and requests.
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The gateway returned a non-2xx status code.
    #[error("Push gateway returned HTTP {0}")]
    HttpStatus(u16),
}

#[derive(Serialize)]
struct GatewayRequest<'a> {
    subscription: serde_json::Value,
    payload: &'a PushMessage,
}

/// Posts `{ subscription, payload }` to a configured gateway URL.
#[derive(Debug, Clone)]
pub struct HttpPushGateway {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl HttpPushGateway {
    /// Create a gateway client with the configured timeout.
    pub fn new(config: &PushConfig) -> Result<Self, PushError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;
        Ok(Self {
            client,
            url: config.gateway_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    async fn try_send(
        &self,
        subscription: &PushSubscription,
        message: &PushMessage,
    ) -> Result<StatusCode, PushError> {
        let body = GatewayRequest {
            subscription: subscription.to_payload(),
            payload: message,
        };
        let mut request = self.client.post(&self.url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        Ok(request.send().await?.status())
    }
}

/// Map a gateway response status to a delivery outcome.
pub fn outcome_for_status(status: StatusCode) -> PushOutcome {
    if status.is_success() {
        PushOutcome::Delivered
    } else if status == StatusCode::GONE || status == StatusCode::NOT_FOUND {
        PushOutcome::Gone
    } else {
        PushOutcome::Failed(PushError::HttpStatus(status.as_u16()).to_string())
    }
}

#[async_trait]
impl PushTransport for HttpPushGateway {
    async fn send(&self, subscription: &PushSubscription, message: &PushMessage) -> PushOutcome {
        match self.try_send(subscription, message).await {
            Ok(status) => {
                let outcome = outcome_for_status(status);
                debug!(
                    subscription_id = %subscription.id,
                    status = status.as_u16(),
                    ?outcome,
                    "Push gateway responded"
                );
                outcome
            }
            Err(e) => {
                warn!(subscription_id = %subscription.id, error = %e, "Push request failed");
                PushOutcome::Failed(e.to_string())
            }
        }
    }
}
