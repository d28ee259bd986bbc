//! Pipeline encoding and response post-processing
//!
//! Network-free half of pipeline execution:
//!
//! - **[`codec`]**: encoder/decoder traits, extended-JSON and plain JSON codecs
//! - **[`options`]**: per-call codec overrides and the named registry
//! - **[`metadata`]**: `_stitch_metadata` hoisting of response warnings

pub mod codec;
pub mod metadata;
pub mod options;

pub use codec::{ExtJsonCodec, JsonCodec, PipelineDecoder, PipelineEncoder};
pub use metadata::hoist_warnings;
pub use options::{
    decoder_named, encoder_named, CodecChoice, PipelineOptions, EXTJSON_CODEC, JSON_CODEC,
};
