//! Testing utilities and helpers
//!
//! - **[`fixtures`]**: JWT and id generators
//! - **[`mocks`]**: a token store that records every mutation
//! - [`init_test_tracing`]: log capture for tests

pub mod fixtures;
pub mod mocks;
mod log_capture;

pub use fixtures::{expired_jwt, fresh_jwt, jwt_with_exp, random_object_id_hex};
pub use mocks::{RecordingTokenStore, StoreOp};
pub use log_capture::init_test_tracing;
