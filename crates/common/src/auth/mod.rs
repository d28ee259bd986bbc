//! Auth helpers
//!
//! Network-free building blocks for the session protocol:
//!
//! - **[`jwt`]**: access-token `exp` claim decoding and expiry checks
//! - **[`redirect`]**: OAuth redirect fragment parsing
//! - **[`state`]**: OAuth state generation and validation

pub mod jwt;
pub mod redirect;
pub mod state;

pub use jwt::{decode_claims, is_expiring, is_expiring_now, ClaimsError, TokenClaims};
pub use redirect::{
    parse_redirect_fragment, RedirectResult, RedirectUserAuth, STATE_VALIDATION_FAILED,
};
pub use state::{generate_state, validate_state};
