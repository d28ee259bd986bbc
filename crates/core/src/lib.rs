//! # Stitch Core
//!
//! Protocol logic with no network access.
//!
//! This crate contains:
//! - The session store and authentication state machine
//! - Port interfaces the transport uses to reach the session
//! - Pipeline codecs and response post-processing
//!
//! ## Architecture Principles
//! - Only depends on `stitch-common` and `stitch-domain`
//! - No HTTP or platform code
//! - All external dependencies via traits

pub mod auth;
pub mod pipeline;

pub use auth::{AuthState, SessionProvider, SessionStore};
pub use pipeline::{
    hoist_warnings, ExtJsonCodec, JsonCodec, PipelineDecoder, PipelineEncoder, PipelineOptions,
};
