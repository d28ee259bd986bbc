//! Pipeline stage types

use bson::Document;
use serde::{Deserialize, Serialize};

/// One operation within a pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    pub action: String,
    #[serde(default)]
    pub args: Document,
}

impl Stage {
    /// Stage handled by the server itself (no service).
    pub fn new(action: impl Into<String>, args: Document) -> Self {
        Self { service: None, action: action.into(), args }
    }

    /// Stage routed to a named service.
    pub fn for_service(
        service: impl Into<String>,
        action: impl Into<String>,
        args: Document,
    ) -> Self {
        Self { service: Some(service.into()), action: action.into(), args }
    }

    /// `literal` stage emitting the given items.
    pub fn literal(items: Vec<bson::Bson>) -> Self {
        let mut args = Document::new();
        args.insert("items", items);
        Self::new("literal", args)
    }
}

/// Ordered stages sent as one request.
pub type Pipeline = Vec<Stage>;
