//! Pipeline execution

use std::sync::Arc;

use bson::Bson;
use reqwest::Method;
use stitch_core::{hoist_warnings, PipelineOptions};
use stitch_domain::constants::PIPELINE_PATH;
use stitch_domain::{Result, Stage, StitchError};
use tracing::{debug, instrument};

use super::request::RequestOptions;
use super::transport::Transport;
use crate::errors::InfraError;

/// Runs pipelines through the authenticated transport.
#[derive(Debug, Clone)]
pub struct PipelineExecutor {
    transport: Arc<Transport>,
}

impl PipelineExecutor {
    pub fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Encode `stages`, POST them to `/pipeline` and decode the reply.
    ///
    /// Codec options are resolved before anything is sent, so an unknown
    /// codec name never reaches the network.
    #[instrument(skip_all, fields(stages = stages.len()))]
    pub async fn execute_pipeline(
        &self,
        stages: &[Stage],
        options: &PipelineOptions,
    ) -> Result<Bson> {
        let (encoder, decoder) = options.resolve()?;
        let body = encoder.encode(stages)?;

        let response = self
            .transport
            .do_authed(PIPELINE_PATH, Method::POST, &RequestOptions::new().with_body(body))
            .await?;

        let bytes = response.bytes().await.map_err(InfraError::from)?;
        let text = std::str::from_utf8(&bytes)
            .map_err(|e| StitchError::Codec(format!("response is not UTF-8: {e}")))?;
        debug!(bytes = bytes.len(), "Decoding pipeline response");

        Ok(hoist_warnings(decoder.decode(text)?))
    }
}
