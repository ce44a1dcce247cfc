//! # bouncer-core — Foundational Types for Bouncer
//!
//! The leaf of the Bouncer dependency DAG. Defines the vocabulary shared by
//! the schema validator and the HTTP boundary:
//!
//! - [`Violation`] / [`Violations`] — the ordered, append-only list of rule
//!   failures returned to clients, and its four-kind taxonomy
//!   ([`ViolationKind`]).
//! - [`Operation`] — the request kind (create, update, or neither) that
//!   selects which field rules apply.
//! - [`merge`] — the whitelist merge of two generic JSON documents used on
//!   the partial-update path.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `bouncer-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod merge;
pub mod operation;
pub mod violation;

pub use error::{DocumentRole, MergeError};
pub use merge::{json_type, merge_documents, merge_encoded};
pub use operation::Operation;
pub use violation::{Violation, ViolationKind, Violations};
