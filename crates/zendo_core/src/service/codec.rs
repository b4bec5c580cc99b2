//! Document wire encoding shared by persistence and import/export.
//!
//! # Responsibility
//! - Encode the full document as deterministic JSON (compact or pretty).
//! - Decode untrusted input behind a minimal top-level shape check.
//!
//! # Invariants
//! - Field order follows struct declaration order, so equal documents encode
//!   to identical bytes.
//! - `deserialize_document(serialize_document(d)) == d` for every document.
//! - Shape checking inspects only `tabs` and `activeTabId`; nested entities are
//!   only checked by typed decoding.

use crate::model::document::Document;
use crate::service::document_store::{StoreError, StoreResult};
use serde_json::Value;

/// Fixed persistence key for the document entry.
pub const STORAGE_KEY: &str = "zendo_state_v1";

/// Encodes the document as compact JSON bytes for persistence.
pub fn serialize_document(document: &Document) -> StoreResult<Vec<u8>> {
    Ok(serde_json::to_vec(document)?)
}

/// Encodes the document as pretty-printed JSON for export files.
pub fn serialize_document_pretty(document: &Document) -> StoreResult<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Decodes a persisted or imported blob.
///
/// # Errors
/// - `Parse` when the bytes are not JSON or nested entities fail to decode.
/// - `InvalidDocumentShape` when top-level `tabs`/`activeTabId` are missing.
pub fn deserialize_document(bytes: &[u8]) -> StoreResult<Document> {
    let candidate: Value = serde_json::from_slice(bytes)?;
    decode_document(candidate)
}

/// Shape-checks and decodes an already-parsed JSON value.
pub fn decode_document(candidate: Value) -> StoreResult<Document> {
    check_shape(&candidate)?;
    Ok(serde_json::from_value(candidate)?)
}

fn check_shape(candidate: &Value) -> StoreResult<()> {
    let Some(object) = candidate.as_object() else {
        return Err(StoreError::InvalidDocumentShape(
            "expected a JSON object at top level".to_string(),
        ));
    };

    match object.get("tabs") {
        Some(Value::Array(_)) => {}
        Some(_) => {
            return Err(StoreError::InvalidDocumentShape(
                "`tabs` must be an array".to_string(),
            ))
        }
        None => {
            return Err(StoreError::InvalidDocumentShape(
                "missing `tabs` field".to_string(),
            ))
        }
    }

    match object.get("activeTabId") {
        Some(Value::String(id)) if !id.trim().is_empty() => Ok(()),
        Some(_) => Err(StoreError::InvalidDocumentShape(
            "`activeTabId` must be a non-empty string".to_string(),
        )),
        None => Err(StoreError::InvalidDocumentShape(
            "missing `activeTabId` field".to_string(),
        )),
    }
}
