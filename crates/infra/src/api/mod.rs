//! Stitch HTTP API
//!
//! # Architecture
//!
//! - [`request`]: per-request options and single-shot dispatch
//! - [`errors`]: non-2xx response classification
//! - [`auth`]: login, logout, refresh, OAuth redirect and impersonation
//! - [`transport`]: public and authenticated requests with one
//!   refresh-and-retry on a rejected session
//! - [`pipeline`]: pipeline encoding, execution and decoding
//!
//! Tokens never appear in log events.

pub mod auth;
pub mod errors;
pub mod pipeline;
pub mod request;
pub mod transport;

pub use auth::{AuthManager, RedirectOutcome};
pub use errors::classify_response;
pub use pipeline::PipelineExecutor;
pub use request::{json, RequestOptions, Requester};
pub use transport::Transport;
