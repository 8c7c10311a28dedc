//! p2c-core - Core library for papers2code
//!
//! This crate provides the community moderation state machine for tracking
//! whether research papers can be reimplemented, including vote records,
//! threshold rules, owner overrides, and the storage seam they write through.

pub mod error;
pub mod types;
pub mod config;
pub mod paper;
pub mod vote;
pub mod moderation;
pub mod store;

pub use error::{ErrorKind, ModerationError, Result};
pub use types::*;
