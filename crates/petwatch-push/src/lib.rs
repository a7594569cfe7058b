//! # petwatch-push
//!
//! Out-of-band delivery of notifications to device push endpoints.
//!
//! Services only see the [`PushTransport`] trait. The shipped
//! [`HttpPushGateway`] posts each message to a push gateway that owns the
//! Web Push encryption and VAPID signing; [`DisabledTransport`] is used
//! when push is switched off.

pub mod gateway;
pub mod transport;

use std::sync::Arc;

use petwatch_core::config::PushConfig;

pub use gateway::{HttpPushGateway, PushError};
pub use transport::{DisabledTransport, PushOutcome, PushTransport};

/// Build the transport selected by configuration.
pub fn build_transport(config: &PushConfig) -> Result<Arc<dyn PushTransport>, PushError> {
    if config.enabled {
        Ok(Arc::new(HttpPushGateway::new(config)?))
    } else {
        Ok(Arc::new(DisabledTransport))
    }
}
