//! Push subscription domain entities.

pub mod model;

pub use model::{PushKeys, PushMessage, PushMessageData, PushSubscription};
