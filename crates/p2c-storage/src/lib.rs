//! p2c-storage - Storage library for papers2code
//!
//! This crate provides the file system implementation of the moderation store.

mod paper_store;

pub use paper_store::FileSystemStore;
