//! Turns zone matches into inbox notifications and push deliveries.

mod service;

pub use service::{DeliveryReport, Notifier};
