//! Per-call pipeline options and the named codec registry

use std::sync::Arc;

use stitch_domain::{Result, StitchError};

use super::codec::{ExtJsonCodec, JsonCodec, PipelineDecoder, PipelineEncoder};

/// Registry name of the extended-JSON codec (the default).
pub const EXTJSON_CODEC: &str = "extjson";
/// Registry name of the plain JSON codec.
pub const JSON_CODEC: &str = "json";

/// A codec supplied either directly or by registry name.
pub enum CodecChoice<T: ?Sized> {
    Named(String),
    Custom(Arc<T>),
}

impl<T: ?Sized> Clone for CodecChoice<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Named(name) => Self::Named(name.clone()),
            Self::Custom(codec) => Self::Custom(Arc::clone(codec)),
        }
    }
}

impl<T: ?Sized> std::fmt::Debug for CodecChoice<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named(name) => f.debug_tuple("Named").field(name).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// Look up an encoder by registry name.
pub fn encoder_named(name: &str) -> Result<Arc<dyn PipelineEncoder>> {
    match name {
        EXTJSON_CODEC => Ok(Arc::new(ExtJsonCodec)),
        JSON_CODEC => Ok(Arc::new(JsonCodec)),
        other => Err(StitchError::Config(format!(
            "encoder option must name a known codec, but \"{other}\" was provided"
        ))),
    }
}

/// Look up a decoder by registry name.
pub fn decoder_named(name: &str) -> Result<Arc<dyn PipelineDecoder>> {
    match name {
        EXTJSON_CODEC => Ok(Arc::new(ExtJsonCodec)),
        JSON_CODEC => Ok(Arc::new(JsonCodec)),
        other => Err(StitchError::Config(format!(
            "decoder option must name a known codec, but \"{other}\" was provided"
        ))),
    }
}

/// Overrides for a single pipeline call. Unset sides use extended JSON.
#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub encoder: Option<CodecChoice<dyn PipelineEncoder>>,
    pub decoder: Option<CodecChoice<dyn PipelineDecoder>>,
}

impl PipelineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_encoder(mut self, encoder: impl PipelineEncoder + 'static) -> Self {
        self.encoder = Some(CodecChoice::Custom(Arc::new(encoder)));
        self
    }

    #[must_use]
    pub fn with_decoder(mut self, decoder: impl PipelineDecoder + 'static) -> Self {
        self.decoder = Some(CodecChoice::Custom(Arc::new(decoder)));
        self
    }

    #[must_use]
    pub fn with_encoder_named(mut self, name: impl Into<String>) -> Self {
        self.encoder = Some(CodecChoice::Named(name.into()));
        self
    }

    #[must_use]
    pub fn with_decoder_named(mut self, name: impl Into<String>) -> Self {
        self.decoder = Some(CodecChoice::Named(name.into()));
        self
    }

    /// Resolve both sides, failing on unknown codec names.
    pub fn resolve(&self) -> Result<(Arc<dyn PipelineEncoder>, Arc<dyn PipelineDecoder>)> {
        let encoder = match &self.encoder {
            None => Arc::new(ExtJsonCodec) as Arc<dyn PipelineEncoder>,
            Some(CodecChoice::Named(name)) => encoder_named(name)?,
            Some(CodecChoice::Custom(encoder)) => Arc::clone(encoder),
        };
        let decoder = match &self.decoder {
            None => Arc::new(ExtJsonCodec) as Arc<dyn PipelineDecoder>,
            Some(CodecChoice::Named(name)) => decoder_named(name)?,
            Some(CodecChoice::Custom(decoder)) => Arc::clone(decoder),
        };
        Ok((encoder, decoder))
    }
}

#[cfg(test)]
mod tests {
    use bson::Bson;
    use stitch_domain::ErrorKind;

    use super::*;

    #[test]
    fn defaults_to_extjson() {
        let (_, decoder) = PipelineOptions::new().resolve().unwrap();
        let value = decoder.decode(r#"{"$oid":"5899445b275d3ebe8f2ab8c0"}"#).unwrap();
        assert!(matches!(value, Bson::ObjectId(_)));
    }

    #[test]
    fn named_codecs_resolve() {
        let options = PipelineOptions::new().with_encoder_named("json").with_decoder_named("json");
        let (_, decoder) = options.resolve().unwrap();
        let value = decoder.decode(r#"{"$oid":"5899445b275d3ebe8f2ab8c0"}"#).unwrap();
        assert!(matches!(value, Bson::Document(_)));
    }

    #[test]
    fn unknown_names_are_config_errors() {
        let Err(err) = PipelineOptions::new().with_decoder_named("xml").resolve() else {
            panic!("unknown decoder name resolved");
        };
        assert_eq!(err.kind(), ErrorKind::ConfigError);
        assert!(err.to_string().contains("xml"));

        let Err(err) = PipelineOptions::new().with_encoder_named("yaml").resolve() else {
            panic!("unknown encoder name resolved");
        };
        assert_eq!(err.kind(), ErrorKind::ConfigError);
    }

    #[test]
    fn custom_decoder_wins() {
        let options = PipelineOptions::new()
            .with_decoder(|_: &str| -> stitch_domain::Result<Bson> { Ok(Bson::Int32(7)) });
        let (_, decoder) = options.resolve().unwrap();
        assert_eq!(decoder.decode("anything").unwrap(), Bson::Int32(7));
    }
}
