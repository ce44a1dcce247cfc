//! # bouncer-schema — Schema-Driven Request Validation
//!
//! Validates JSON request bodies against an explicit per-field rule table
//! and, for partial updates, merges the validated result back onto the
//! client's original document.
//!
//! ## Pieces
//!
//! - [`rule`] / [`schema`] — [`FieldRule`], [`Modifier`], [`Schema`]: the
//!   static description of a resource shape.
//! - [`shape`] — the [`Fields`] and [`Shape`] traits a struct implements to
//!   be validated, in place of runtime reflection.
//! - [`decode`] — JSON bytes to a zero-initialised instance.
//! - [`validate`] — the recursive create/update rule pass.
//! - [`Bouncer`] — the registered, shareable entry point tying the above
//!   together with the whitelist merge from `bouncer-core`.
//!
//! ## Crate Policy
//!
//! - Depends only on `bouncer-core` internally.
//! - Client mistakes are [`Violations`](bouncer_core::Violations), never
//!   errors. Errors ([`SchemaError`], [`BouncerError`]) are reserved for
//!   server-side misconfiguration.

pub mod bouncer;
pub mod decode;
pub mod error;
pub mod rule;
pub mod schema;
pub mod shape;
pub mod validate;

pub use bouncer::{Bouncer, Merged, Validated};
pub use decode::decode;
pub use error::{BouncerError, SchemaError};
pub use rule::{FieldRule, Modifier, Modifiers, ValueKind};
pub use schema::Schema;
pub use shape::{FieldMut, Fields, IsZero, Shape};
pub use validate::validate_fields;
