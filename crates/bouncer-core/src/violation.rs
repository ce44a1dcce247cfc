//! # Violations — Structured Validation Failures
//!
//! A [`Violation`] records one rule failure: the path of field names from
//! the document root to the offending field, the failure kind, and a short
//! message. [`Violations`] is the ordered list accumulated over a whole
//! validation pass and serialized verbatim into the response body.
//!
//! ## Wire Format
//!
//! ```json
//! [
//!   {"field": ["author", "name"], "kind": "RequiredError", "message": "Required"}
//! ]
//! ```
//!
//! An empty `field` path refers to the document as a whole (used for
//! bodies that could not be decoded).

use std::fmt;

use serde::{Deserialize, Serialize};

/// Message attached to required-on-create failures.
pub const REQUIRED_MESSAGE: &str = "Required";

/// Message attached to immutability failures.
pub const IMMUTABLE_MESSAGE: &str = "Immutable";

/// Classification of a validation failure.
///
/// The order of the variants mirrors response precedence: a body with any
/// deserialization failure is malformed regardless of what else was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationKind {
    /// The body could not be read or parsed.
    #[serde(rename = "DeserializationError")]
    Deserialization,
    /// The body representation is not supported. Reserved: only JSON is
    /// accepted today, so nothing emits it yet.
    #[serde(rename = "ContentTypeError")]
    ContentType,
    /// A required-on-create field was left at its zero value.
    #[serde(rename = "RequiredError")]
    Required,
    /// A field that is immutable for this operation was supplied.
    #[serde(rename = "ImmutableError")]
    Immutable,
}

impl ViolationKind {
    /// Returns the external name used in response bodies.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deserialization => "DeserializationError",
            Self::ContentType => "ContentTypeError",
            Self::Required => "RequiredError",
            Self::Immutable => "ImmutableError",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single rule failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Field names from the document root to the offending field.
    pub field: Vec<String>,
    /// Failure classification.
    pub kind: ViolationKind,
    /// Human-readable description.
    pub message: String,
}

impl Violation {
    /// Create a violation at the given path.
    pub fn new<I, S>(field: I, kind: ViolationKind, message: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            field: field.into_iter().map(Into::into).collect(),
            kind,
            message: message.into(),
        }
    }

    /// Dotted rendering of the field path, `(root)` when empty.
    pub fn path(&self) -> String {
        if self.field.is_empty() {
            "(root)".to_string()
        } else {
            self.field.join(".")
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.path(), self.message, self.kind)
    }
}

/// Ordered, append-only collection of violations.
///
/// Empty means the request passed. Serializes as a bare JSON array.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Violations {
    violations: Vec<Violation>,
}

impl Violations {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a violation at the given path.
    pub fn add<I, S>(&mut self, field: I, kind: ViolationKind, message: impl Into<String>)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.violations.push(Violation::new(field, kind, message));
    }

    /// Append an already-built violation.
    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Append every violation from `nested`, prefixing each path with `prefix`.
    pub fn extend_nested(&mut self, prefix: &str, nested: Violations) {
        for mut violation in nested.violations {
            violation.field.insert(0, prefix.to_string());
            self.violations.push(violation);
        }
    }

    /// Whether any violation of `kind` was recorded.
    pub fn has(&self, kind: ViolationKind) -> bool {
        self.violations.iter().any(|v| v.kind == kind)
    }

    /// Returns the number of violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Returns true if there are no violations.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.violations.iter()
    }

    /// Returns a slice of all violations.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Consumes self and returns the inner Vec.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

impl From<Violation> for Violations {
    fn from(violation: Violation) -> Self {
        Self {
            violations: vec![violation],
        }
    }
}

impl Extend<Violation> for Violations {
    fn extend<I: IntoIterator<Item = Violation>>(&mut self, iter: I) {
        self.violations.extend(iter);
    }
}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}

impl<'a> IntoIterator for &'a Violations {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}

impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}
