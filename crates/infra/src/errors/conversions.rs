//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use serde_json::Error as JsonError;
use stitch_domain::StitchError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub StitchError);

impl From<InfraError> for StitchError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<StitchError> for InfraError {
    fn from(value: StitchError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoStitchError {
    fn into_stitch(self) -> StitchError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → StitchError */
/* -------------------------------------------------------------------------- */

impl IntoStitchError for HttpError {
    fn into_stitch(self) -> StitchError {
        if self.is_timeout() {
            return StitchError::Network("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return StitchError::Network("HTTP connection failure".into());
        }

        if self.is_builder() {
            return StitchError::Config(format!("invalid HTTP request: {self}"));
        }

        if self.is_decode() {
            return StitchError::Codec(format!("cannot decode response body: {self}"));
        }

        StitchError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_stitch())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → StitchError */
/* -------------------------------------------------------------------------- */

impl IntoStitchError for JsonError {
    fn into_stitch(self) -> StitchError {
        StitchError::Codec(format!("invalid JSON: {self}"))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_stitch())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
