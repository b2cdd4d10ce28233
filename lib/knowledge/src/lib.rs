//! Static knowledge base of supported AWS services.
//!
//! This crate provides:
//!
//! - **Service entries**: name, description, per-access-method instructions,
//!   troubleshooting steps, and subtopics for each supported service
//! - **Access methods**: the console / CLI / SDK split used when answering
//!   "how do I" questions
//!
//! The table is read-only for the lifetime of the process.

pub mod access;
pub mod catalog;
pub mod error;
pub mod service;

pub use access::AccessMethod;
pub use catalog::KnowledgeBase;
pub use error::KnowledgeError;
pub use service::{ServiceEntry, ServiceSummary};
