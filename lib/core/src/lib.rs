//! Core domain types and utilities for cloudbuddy.
//!
//! This crate provides the foundational types, error handling, and shared
//! identifiers used throughout the cloudbuddy AWS learning assistant.

pub mod error;
pub mod id;

pub use error::Result;
pub use id::{RequestId, SessionKey};
