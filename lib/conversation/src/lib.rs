//! Conversation services for cloudbuddy.
//!
//! This crate provides:
//!
//! - **Session Store**: per-session conversation memory with sticky
//!   service/topic fields, bounded in size and idle lifetime
//! - **Detector**: keyword-based detection of the service, topic, and
//!   access method a message is about, plus follow-up recognition

pub mod detect;
pub mod session;
pub mod store;

pub use detect::{Detector, ServiceScore};
pub use session::{ConversationContext, Exchange};
pub use store::{SessionStore, SessionStoreConfig, session_key_for};
