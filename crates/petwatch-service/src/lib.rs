//! # petwatch-service
//!
//! Business logic for PetWatch. Each service receives its stores, the
//! clock, and its configuration section at construction time via `Arc`
//! references, and every caller-facing operation takes an explicit
//! [`RequestContext`].

pub mod comment;
pub mod context;
pub mod matching;
pub mod notification;
pub mod notifier;
pub mod push;
pub mod sighting;
pub mod user;
pub mod zone;

pub use comment::{CommentDraft, CommentService};
pub use context::RequestContext;
pub use matching::ZoneMatcher;
pub use notification::NotificationService;
pub use notifier::{DeliveryReport, Notifier};
pub use push::PushSubscriptionService;
pub use sighting::{SightingDraft, SightingPatch, SightingService};
pub use user::{ProfilePatch, UserProfileService};
pub use zone::ZoneService;
