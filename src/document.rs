//! Helpers for building and rendering the documents passed through the facade.

use mongodb::bson::{Bson, Document, doc};

use crate::error::{Error, Result};

/// Parse Extended JSON text (relaxed or canonical) into a document.
pub fn parse_document(json: &str) -> Result<Document> {
    let value: serde_json::Value = serde_json::from_str(json.trim())?;
    let bson = Bson::try_from(value).map_err(|e| Error::Parse(e.to_string()))?;
    match bson {
        Bson::Document(document) => Ok(document),
        other => {
            Err(Error::Parse(format!("expected a JSON object, got {:?}", other.element_type())))
        }
    }
}

/// Filter matching documents where `key` is present (or absent).
/// e.g. `{ "en": { "$exists": true } }`
pub fn key_exists_filter(key: &str, exists: bool) -> Document {
    let mut filter = Document::new();
    filter.insert(key, doc! { "$exists": exists });
    filter
}

/// Render a document as relaxed Extended JSON on one line.
pub fn to_relaxed_json(document: &Document) -> String {
    Bson::Document(document.clone()).into_relaxed_extjson().to_string()
}
