//! Push subscription registration.

mod service;

pub use service::PushSubscriptionService;
