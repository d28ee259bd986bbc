//! Response metadata hoisting

use bson::{Bson, Document};
use stitch_domain::constants::{METADATA_FIELD, WARNINGS_FIELD};

/// Copy top-level `warnings` into `_stitch_metadata.warnings`.
///
/// Everything else, `warnings` included, is left where it was. Values that
/// are not documents pass through untouched.
pub fn hoist_warnings(value: Bson) -> Bson {
    let Bson::Document(mut doc) = value else {
        return value;
    };
    let Some(warnings) = doc.get(WARNINGS_FIELD).cloned() else {
        return Bson::Document(doc);
    };

    let mut metadata = match doc.remove(METADATA_FIELD) {
        Some(Bson::Document(existing)) => existing,
        _ => Document::new(),
    };
    metadata.insert(WARNINGS_FIELD, warnings);
    doc.insert(METADATA_FIELD, metadata);
    Bson::Document(doc)
}
