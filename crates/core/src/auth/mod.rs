//! Session state and the ports the transport uses to reach it
//!
//! - **[`session_store`]**: typed, namespaced view of a token store
//! - **[`state`]**: the logged-out / logged-in / impersonating machine
//! - **[`ports`]**: [`SessionProvider`], implemented by the auth manager

pub mod ports;
pub mod session_store;
pub mod state;

pub use ports::SessionProvider;
pub use session_store::SessionStore;
pub use state::AuthState;
