//! Domain types and models

pub mod device;
pub mod pipeline;
pub mod provider;
pub mod session;

pub use device::DeviceInfo;
pub use pipeline::{Pipeline, Stage};
pub use provider::{AuthProvider, Credentials};
pub use session::{AuthResponse, NewAccessToken, Session};
