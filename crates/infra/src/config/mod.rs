//! Configuration loading
//!
//! Loads [`stitch_domain::ClientConfig`] from environment variables and
//! files.

pub mod loader;

// Re-export commonly used items
pub use loader::{from_lookup, load, load_from_env, load_from_file, probe_config_paths};
