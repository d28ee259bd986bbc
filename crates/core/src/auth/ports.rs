//! Port interfaces for session access
//!
//! The transport depends on these traits rather than on the concrete auth
//! manager, which lives in infra and itself needs the network.

use async_trait::async_trait;
use stitch_domain::{Result, Session};

/// Source of the current session for authenticated requests.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Session as currently stored.
    fn session(&self) -> Session;

    /// Drop the session after the server rejected it for good.
    fn clear_session(&self);

    /// Refresh ahead of time when the access token is about to expire.
    ///
    /// Returns whether a refresh took place.
    async fn ensure_fresh(&self) -> Result<bool>;

    /// Obtain a new access token.
    ///
    /// `stale_access_token` is the token the server just rejected; when the
    /// stored token already differs, another caller refreshed meanwhile and
    /// no request is made.
    async fn refresh(&self, stale_access_token: Option<&str>) -> Result<()>;
}
