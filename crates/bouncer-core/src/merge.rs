//! # Whitelist Merge
//!
//! Reconciles a *reference* document (the client's own partial-update body)
//! with a *candidate* document (the validated, re-encoded typed instance).
//!
//! Typed decoding fills every schema field with its zero value, so the
//! candidate carries keys the client never sent. The reference is the
//! authoritative key set: the merged document holds exactly the keys the
//! reference holds at each level, minus the ones the schema does not own,
//! with values taken from the candidate so trimming and other
//! normalisation survive.
//!
//! ## Rules
//!
//! For each key of a reference object:
//!
//! | Reference value | Candidate value    | Result                         |
//! |-----------------|--------------------|--------------------------------|
//! | any             | absent             | key dropped                    |
//! | array           | any                | reference array, verbatim      |
//! | object          | object             | recursive merge                |
//! | anything else   | present            | candidate value                |
//!
//! Keys present only in the candidate never appear in the output. Both
//! top-level documents must be objects.

use serde_json::{Map, Value};

use crate::error::{DocumentRole, MergeError};

/// Merge two generic documents.
///
/// # Errors
///
/// Returns [`MergeError::ShapeMismatch`] unless both documents are objects.
pub fn merge_documents(reference: Value, candidate: Value) -> Result<Value, MergeError> {
    match (reference, candidate) {
        (Value::Object(reference), Value::Object(candidate)) => {
            Ok(Value::Object(merge_objects(reference, candidate)))
        }
        (reference, candidate) => Err(MergeError::ShapeMismatch {
            reference: json_type(&reference),
            candidate: json_type(&candidate),
        }),
    }
}

/// Parse both documents, merge them, and encode the result.
///
/// # Errors
///
/// Returns [`MergeError::Parse`] tagged with the offending side when either
/// input is not valid JSON, and [`MergeError::ShapeMismatch`] as for
/// [`merge_documents`].
pub fn merge_encoded(reference: &[u8], candidate: &[u8]) -> Result<Vec<u8>, MergeError> {
    let reference: Value = serde_json::from_slice(reference).map_err(|source| MergeError::Parse {
        role: DocumentRole::Reference,
        source,
    })?;
    let candidate: Value = serde_json::from_slice(candidate).map_err(|source| MergeError::Parse {
        role: DocumentRole::Candidate,
        source,
    })?;

    let merged = merge_documents(reference, candidate)?;
    serde_json::to_vec(&merged).map_err(MergeError::Encode)
}

fn merge_objects(reference: Map<String, Value>, mut candidate: Map<String, Value>) -> Map<String, Value> {
    reference
        .into_iter()
        .filter_map(|(key, value)| {
            // Not in the candidate: the schema does not own it.
            let incoming = candidate.remove(&key)?;
            Some((key, merge_values(value, incoming)))
        })
        .collect()
}

fn merge_values(reference: Value, candidate: Value) -> Value {
    match (reference, candidate) {
        (Value::Object(reference), Value::Object(candidate)) => {
            Value::Object(merge_objects(reference, candidate))
        }
        // Element identity is unknowable; arrays pass through whole.
        (reference @ Value::Array(_), _) => reference,
        (_, candidate) => candidate,
    }
}

/// Name of the JSON type of `value`, for diagnostics.
pub fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
