//! # Decoder
//!
//! Parses a request body into a zero-initialised instance of a shape.
//!
//! - An empty (or whitespace-only) body is not an error: the zero value is
//!   returned untouched.
//! - Only the first JSON value in the body is decoded; trailing bytes are
//!   ignored here.
//! - The body must be a JSON object. Anything else (including an array,
//!   which serde would otherwise accept for a struct) is a deserialization
//!   violation and yields the zero value.
//! - A malformed body produces one deserialization violation with an empty
//!   field path. If the body is an object with some ill-typed keys, the
//!   well-typed top-level keys are still decoded, so the instance is only
//!   partially zero and rules do not report supplied fields as missing.

use bouncer_core::{json_type, ViolationKind, Violations};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Decode `body` into a `T`, reporting malformed input as a violation.
pub fn decode<T>(body: &[u8]) -> (T, Violations)
where
    T: DeserializeOwned + Default,
{
    let mut violations = Violations::new();

    if body.iter().all(u8::is_ascii_whitespace) {
        return (T::default(), violations);
    }

    let mut stream = serde_json::Deserializer::from_slice(body).into_iter::<Value>();
    let fields = match stream.next() {
        Some(Ok(Value::Object(fields))) => fields,
        Some(Ok(other)) => {
            let message = format!("expected a JSON object, found {}", json_type(&other));
            reject::<T>(&mut violations, message);
            return (T::default(), violations);
        }
        Some(Err(err)) => {
            reject::<T>(&mut violations, err.to_string());
            return (T::default(), violations);
        }
        None => return (T::default(), violations),
    };

    let document = Value::Object(fields);
    match T::deserialize(&document) {
        Ok(instance) => (instance, violations),
        Err(err) => {
            reject::<T>(&mut violations, err.to_string());
            let instance = match document {
                Value::Object(fields) => salvage(fields),
                _ => T::default(),
            };
            (instance, violations)
        }
    }
}

/// Decode only the top-level keys that are well-typed on their own.
fn salvage<T>(fields: Map<String, Value>) -> T
where
    T: DeserializeOwned + Default,
{
    let kept: Map<String, Value> = fields
        .into_iter()
        .filter(|(key, value)| {
            let single = Value::Object(Map::from_iter([(key.clone(), value.clone())]));
            T::deserialize(&single).is_ok()
        })
        .collect();
    T::deserialize(&Value::Object(kept)).unwrap_or_default()
}

fn reject<T>(violations: &mut Violations, message: String) {
    tracing::warn!(
        shape = std::any::type_name::<T>(),
        error = %message,
        "request body failed to decode"
    );
    violations.add(Vec::<String>::new(), ViolationKind::Deserialization, message);
}
