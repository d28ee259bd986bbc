//! Pipeline request/response codecs
//!
//! Encoders turn stages into a request body; decoders turn the response text
//! into a [`Bson`] value. Any `Fn` with the right shape is a codec, so
//! callers can override either side with a closure.

use bson::{Bson, Document};
use stitch_domain::{Result, Stage, StitchError};

/// Serialises pipeline stages into a request body.
pub trait PipelineEncoder: Send + Sync {
    fn encode(&self, stages: &[Stage]) -> Result<String>;
}

/// Parses a response body into a structured value.
pub trait PipelineDecoder: Send + Sync {
    fn decode(&self, body: &str) -> Result<Bson>;
}

impl<F> PipelineEncoder for F
where
    F: Fn(&[Stage]) -> Result<String> + Send + Sync,
{
    fn encode(&self, stages: &[Stage]) -> Result<String> {
        self(stages)
    }
}

impl<F> PipelineDecoder for F
where
    F: Fn(&str) -> Result<Bson> + Send + Sync,
{
    fn decode(&self, body: &str) -> Result<Bson> {
        self(body)
    }
}

/// MongoDB extended JSON in relaxed mode.
///
/// Object ids, dates and binary survive the round-trip as `$oid`, `$date`
/// and `$binary` wrappers.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtJsonCodec;

impl PipelineEncoder for ExtJsonCodec {
    fn encode(&self, stages: &[Stage]) -> Result<String> {
        let value = bson::to_bson(stages)
            .map_err(|e| StitchError::Codec(format!("cannot encode stages: {e}")))?;
        serde_json::to_string(&value.into_relaxed_extjson())
            .map_err(|e| StitchError::Codec(format!("cannot serialise stages: {e}")))
    }
}

impl PipelineDecoder for ExtJsonCodec {
    fn decode(&self, body: &str) -> Result<Bson> {
        let json: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| StitchError::Codec(format!("response is not JSON: {e}")))?;
        Bson::try_from(json)
            .map_err(|e| StitchError::Codec(format!("response is not extended JSON: {e}")))
    }
}

/// Plain JSON; `$`-prefixed wrappers are left as ordinary documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl PipelineEncoder for JsonCodec {
    fn encode(&self, stages: &[Stage]) -> Result<String> {
        serde_json::to_string(stages)
            .map_err(|e| StitchError::Codec(format!("cannot serialise stages: {e}")))
    }
}

impl PipelineDecoder for JsonCodec {
    fn decode(&self, body: &str) -> Result<Bson> {
        let json: serde_json::Value = serde_json::from_str(body)
            .map_err(|e| StitchError::Codec(format!("response is not JSON: {e}")))?;
        Ok(plain_json_to_bson(json))
    }
}

fn plain_json_to_bson(value: serde_json::Value) -> Bson {
    use serde_json::Value;

    match value {
        Value::Null => Bson::Null,
        Value::Bool(b) => Bson::Boolean(b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => i32::try_from(i).map_or(Bson::Int64(i), Bson::Int32),
            None => n.as_f64().map_or(Bson::Null, Bson::Double),
        },
        Value::String(s) => Bson::String(s),
        Value::Array(items) => Bson::Array(items.into_iter().map(plain_json_to_bson).collect()),
        Value::Object(map) => {
            let mut doc = Document::new();
            for (key, value) in map {
                doc.insert(key, plain_json_to_bson(value));
            }
            Bson::Document(doc)
        }
    }
}
