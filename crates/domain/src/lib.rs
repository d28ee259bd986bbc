//! # Stitch Domain
//!
//! Data types shared by every Stitch SDK crate.
//!
//! This crate contains:
//! - Session, device info and pipeline stage types
//! - The [`StitchError`] taxonomy and `Result` alias
//! - Client configuration
//! - Endpoint paths, storage keys and sentinel codes
//!
//! ## Architecture
//! - No dependencies on other Stitch crates
//! - No I/O

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
