//! # Bouncer — Per-Shape Validation Entry Point
//!
//! A [`Bouncer<T>`] is registered once per resource shape, typically while
//! the application state is built. Registration checks the shape's schema
//! and probes a zero-valued instance, so a misconfigured shape fails at
//! startup instead of on the first request.
//!
//! After registration the bouncer is immutable and can be shared across
//! threads behind an `Arc`.
//!
//! ## Pipelines
//!
//! - [`Bouncer::validate`] — decode, then evaluate rules for the operation.
//! - [`Bouncer::validate_and_merge`] — the partial-update path: validate,
//!   re-encode the instance, and whitelist-merge it onto the client's raw
//!   body so zero-filled fields the client never sent are dropped.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use bouncer_core::{merge_encoded, MergeError, Operation, ViolationKind, Violations};

use crate::decode::decode;
use crate::error::{BouncerError, SchemaError};
use crate::schema::Schema;
use crate::shape::{probe, Shape};
use crate::validate::validate_fields;

/// Result of [`Bouncer::validate`]: the decoded instance and every
/// violation found. Both are always present.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated<T> {
    /// The decoded (and trimmed) instance. Zero-valued if decoding failed.
    pub instance: T,
    /// Violations; empty means the body passed.
    pub violations: Violations,
}

impl<T> Validated<T> {
    /// Whether the body passed validation.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Result of [`Bouncer::validate_and_merge`].
#[derive(Debug, Clone, PartialEq)]
pub struct Merged<T> {
    /// The decoded (and trimmed) instance.
    pub instance: T,
    /// The merged JSON document. Empty when `violations` is not.
    pub document: Vec<u8>,
    /// Violations; empty means the body passed.
    pub violations: Violations,
}

impl<T> Merged<T> {
    /// Whether the body passed validation and merging.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Validator for one resource shape.
pub struct Bouncer<T> {
    schema: Arc<Schema>,
    _shape: PhantomData<fn() -> T>,
}

impl<T: Shape> Bouncer<T> {
    /// Register `T`, checking its schema against itself and the type.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] if the schema is inconsistent or the type
    /// does not expose a declared field with the declared kind.
    pub fn new() -> Result<Self, SchemaError> {
        let schema = T::schema();
        schema.check()?;
        probe(&schema, &mut T::default())?;

        tracing::debug!(
            shape = schema.shape(),
            fields = schema.len(),
            "registered resource shape"
        );

        Ok(Self {
            schema: Arc::new(schema),
            _shape: PhantomData,
        })
    }

    /// The checked schema.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Decode `body` into a `T` and validate it for `operation`.
    ///
    /// Rules still run after a decode failure, against the zero value,
    /// so the caller sees every problem at once.
    ///
    /// # Errors
    ///
    /// Returns [`BouncerError::Schema`] only if the shape disagrees with
    /// its schema at request time.
    pub fn validate(&self, body: &[u8], operation: Operation) -> Result<Validated<T>, BouncerError> {
        let (mut instance, mut violations) = decode::<T>(body);
        violations.extend(validate_fields(&self.schema, &mut instance, operation)?);

        tracing::debug!(
            shape = self.schema.shape(),
            %operation,
            violations = violations.len(),
            "validated request body"
        );

        Ok(Validated {
            instance,
            violations,
        })
    }

    /// Validate an update body, then merge the validated instance onto
    /// the raw body so only keys the client sent survive.
    ///
    /// # Errors
    ///
    /// - [`BouncerError::NotAnUpdate`] if `operation` is not an update.
    /// - [`BouncerError::Encode`] if the instance cannot be re-encoded.
    /// - [`BouncerError::Merge`] if the shape does not encode to an object.
    ///
    /// A body that is not a JSON object is reported as a deserialization
    /// violation by the decoder, before any merge is attempted. A reference
    /// that still fails to parse or is not an object is likewise reported
    /// as a violation, never as an error.
    pub fn validate_and_merge(
        &self,
        body: &[u8],
        operation: Operation,
    ) -> Result<Merged<T>, BouncerError> {
        if operation != Operation::Update {
            return Err(BouncerError::NotAnUpdate(operation));
        }

        let Validated {
            instance,
            mut violations,
        } = self.validate(body, operation)?;

        if !violations.is_empty() {
            return Ok(Merged {
                instance,
                document: Vec::new(),
                violations,
            });
        }

        let candidate = serde_json::to_vec(&instance)?;
        let document = match merge_encoded(body, &candidate) {
            Ok(document) => document,
            Err(err) if !err.is_fatal() => {
                let message = match err {
                    MergeError::Parse { source, .. } => source.to_string(),
                    MergeError::ShapeMismatch { reference, .. } => {
                        format!("expected a JSON object, found {reference}")
                    }
                    other => other.to_string(),
                };
                violations.add(Vec::<String>::new(), ViolationKind::Deserialization, message);
                Vec::new()
            }
            Err(err) => {
                tracing::error!(
                    shape = self.schema.shape(),
                    error = %err,
                    "whitelist merge failed"
                );
                return Err(err.into());
            }
        };

        Ok(Merged {
            instance,
            document,
            violations,
        })
    }
}

impl<T> Clone for Bouncer<T> {
    fn clone(&self) -> Self {
        Self {
            schema: Arc::clone(&self.schema),
            _shape: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Bouncer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bouncer")
            .field("shape", &self.schema.shape())
            .field("fields", &self.schema.len())
            .finish()
    }
}
