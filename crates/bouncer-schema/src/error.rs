//! # Error Types
//!
//! Two families, kept apart on purpose:
//!
//! - [`SchemaError`] — a resource shape is misconfigured. Raised when a
//!   [`Bouncer`](crate::Bouncer) is registered, before any request is
//!   served. Never shown to clients.
//! - [`BouncerError`] — a fatal failure during a validation or merge pass.
//!   Client input problems are *not* errors; they are
//!   [`Violations`](bouncer_core::Violations) returned alongside the
//!   decoded instance.

use bouncer_core::{MergeError, Operation};
use thiserror::Error;

/// A resource shape's schema is inconsistent with itself or with the type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// A field was declared with an empty name.
    #[error("schema '{shape}': field names must not be empty")]
    EmptyFieldName {
        /// Shape the rule belongs to.
        shape: String,
    },

    /// Two fields at the same level share a name.
    #[error("schema '{shape}': field '{field}' is declared more than once")]
    DuplicateField {
        /// Shape the rule belongs to.
        shape: String,
        /// The repeated field name.
        field: String,
    },

    /// A nested or optional-nested field has no nested schema.
    #[error("schema '{shape}': field '{field}' is {kind} but declares no nested schema")]
    MissingNestedSchema {
        /// Shape the rule belongs to.
        shape: String,
        /// Offending field.
        field: String,
        /// Declared value kind.
        kind: String,
    },

    /// A scalar or sequence field carries a nested schema.
    #[error("schema '{shape}': field '{field}' is {kind} and cannot carry a nested schema")]
    UnexpectedNestedSchema {
        /// Shape the rule belongs to.
        shape: String,
        /// Offending field.
        field: String,
        /// Declared value kind.
        kind: String,
    },

    /// A field is both required and immutable on create, so no create
    /// request could ever pass.
    #[error("schema '{shape}': field '{field}' is both required and immutable on create")]
    ConflictingModifiers {
        /// Shape the rule belongs to.
        shape: String,
        /// Offending field.
        field: String,
    },

    /// A modifier list contained an unrecognised token.
    #[error("unknown field modifier '{0}'")]
    UnknownModifier(String),

    /// The type exposes no accessor for a declared field.
    #[error("schema '{shape}': type has no accessor for field '{field}'")]
    MissingAccessor {
        /// Shape the rule belongs to.
        shape: String,
        /// Field the accessor was requested for.
        field: String,
    },

    /// The accessor's value kind disagrees with the declared kind.
    #[error("schema '{shape}': field '{field}' is declared {declared} but its accessor yields {actual}")]
    KindMismatch {
        /// Shape the rule belongs to.
        shape: String,
        /// Offending field.
        field: String,
        /// Kind from the schema.
        declared: String,
        /// Kind observed on the type.
        actual: String,
    },
}

/// Fatal failure of a validation or merge pass.
#[derive(Error, Debug)]
pub enum BouncerError {
    /// The shape did not match its schema at request time.
    #[error("schema configuration error: {0}")]
    Schema(#[from] SchemaError),

    /// The whitelist merge failed for a server-side reason.
    #[error("merge failed: {0}")]
    Merge(#[from] MergeError),

    /// The validated instance could not be re-encoded.
    #[error("failed to encode validated instance: {0}")]
    Encode(#[from] serde_json::Error),

    /// Merging was requested for an operation other than update.
    #[error("validate-and-merge applies to update operations only, got '{0}'")]
    NotAnUpdate(Operation),
}
