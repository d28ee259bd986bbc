//! # Stitch Infrastructure
//!
//! Network-facing implementation of the Stitch client.
//!
//! This crate contains:
//! - HTTP client and response classification
//! - Auth manager (login, refresh, OAuth redirect, impersonation)
//! - Authenticated transport and pipeline executor
//! - Service helpers and the [`StitchClient`] facade
//! - Configuration loading
//!
//! ## Architecture
//! - Implements traits defined in `stitch-core`
//! - Depends on `stitch-domain`, `stitch-common` and `stitch-core`
//! - Contains all "impure" code (HTTP, keychain, files)

pub mod api;
pub mod client;
pub mod config;
pub mod errors;
pub mod http;
pub mod services;

// Re-export commonly used items
pub use api::{AuthManager, PipelineExecutor, RedirectOutcome, RequestOptions, Transport};
pub use client::StitchClient;
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
pub use services::{Collection, Database, MongoService};
