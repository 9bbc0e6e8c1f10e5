//! Shared test utilities for the gallery workspace.
//!
//! This crate provides common testing infrastructure including:
//! - An in-memory bucket with injectable failures
//! - Bucket layouts and dictionary files matching the production conventions
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{fixtures, FakeBucket};
//! ```

pub mod bucket;
pub mod fixtures;

pub use bucket::FakeBucket;
pub use fixtures::*;
