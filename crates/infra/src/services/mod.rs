//! Service helpers
//!
//! Typed wrappers that build pipeline stages for server-side services and run
//! them through the [`crate::api::PipelineExecutor`].

pub mod mongodb;

pub use mongodb::{Collection, Database, MongoService, UpdateMode};

/// Service kind accepted by [`crate::StitchClient::service`].
pub const MONGODB_SERVICE: &str = "mongodb";
