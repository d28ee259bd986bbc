//! Common building blocks shared across Stitch SDK crates.
//!
//! # Safety and Quality
//!
//! This crate enforces strict safety and quality standards to ensure
//! reliability across all Stitch components.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - default: token storage trait and in-memory store, auth helpers
//! - `platform`: persistent token storage in the OS keychain
//! - `test-utils`: fixtures, mocks and log capture for downstream tests

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

pub mod auth;
pub mod storage;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", test))]
pub mod testing;

pub use storage::{detect_token_store, MemoryTokenStore, TokenStore};
#[cfg(feature = "platform")]
pub use storage::KeychainTokenStore;
