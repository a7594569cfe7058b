//! The recipient's notification inbox.

mod service;

pub use service::NotificationService;
