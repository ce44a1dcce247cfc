//! # Validator
//!
//! One depth-first pass over a decoded instance, in field-declaration
//! order. For every non-skipped field:
//!
//! 1. Text is whitespace-trimmed in place unless the rule says `no_trim`.
//! 2. Nested structures (and populated optional ones) are validated with
//!    the same operation; their violation paths are prefixed with the
//!    field's name.
//! 3. Operation rules apply:
//!    - **Create**: `immutable_on_create` fields must be zero;
//!      `required_on_create` fields must not be.
//!    - **Update**: `immutable_on_update` fields must be zero. Nothing is
//!      required.
//!    - **None**: no rules.
//!
//! The pass never stops early. Every violation at every level is collected.

use bouncer_core::violation::{IMMUTABLE_MESSAGE, REQUIRED_MESSAGE};
use bouncer_core::{Operation, ViolationKind, Violations};

use crate::error::SchemaError;
use crate::rule::{FieldRule, Modifier};
use crate::schema::Schema;
use crate::shape::{access, FieldMut, Fields};

/// Validate `target` against `schema` for `operation`.
///
/// Text fields of `target` may be trimmed as a side effect.
///
/// # Errors
///
/// Returns [`SchemaError`] if `target` does not expose a declared field or
/// exposes it with the wrong kind. Client mistakes are never errors; they
/// are returned as [`Violations`].
pub fn validate_fields(
    schema: &Schema,
    target: &mut dyn Fields,
    operation: Operation,
) -> Result<Violations, SchemaError> {
    let mut violations = Violations::new();
    walk(schema, target, operation, &mut violations)?;
    Ok(violations)
}

fn walk(
    schema: &Schema,
    target: &mut dyn Fields,
    operation: Operation,
    out: &mut Violations,
) -> Result<(), SchemaError> {
    for rule in schema.fields() {
        if rule.is_skipped() {
            continue;
        }

        let is_zero = match access(schema, rule, &mut *target)? {
            FieldMut::Text(text) => {
                if rule.trims() {
                    trim_in_place(text);
                }
                text.is_empty()
            }
            FieldMut::Value(value) => value.is_zero(),
            FieldMut::Nested(nested) => {
                descend(schema, rule, &mut *nested, operation, out)?;
                nested.is_zero()
            }
            FieldMut::OptionalNested(Some(nested)) => {
                descend(schema, rule, nested, operation, out)?;
                false
            }
            FieldMut::OptionalNested(None) => true,
        };

        apply_rules(rule, is_zero, operation, out);
    }
    Ok(())
}

fn descend(
    schema: &Schema,
    rule: &FieldRule,
    nested: &mut dyn Fields,
    operation: Operation,
    out: &mut Violations,
) -> Result<(), SchemaError> {
    let mut inner = Violations::new();
    walk(schema.nested_of(rule)?, nested, operation, &mut inner)?;
    out.extend_nested(rule.display_name(), inner);
    Ok(())
}

fn apply_rules(rule: &FieldRule, is_zero: bool, operation: Operation, out: &mut Violations) {
    let name = rule.display_name();
    match operation {
        Operation::Create => {
            if rule.has(Modifier::ImmutableOnCreate) && !is_zero {
                out.add([name], ViolationKind::Immutable, IMMUTABLE_MESSAGE);
            }
            if rule.has(Modifier::RequiredOnCreate) && is_zero {
                out.add([name], ViolationKind::Required, REQUIRED_MESSAGE);
            }
        }
        Operation::Update => {
            if rule.has(Modifier::ImmutableOnUpdate) && !is_zero {
                out.add([name], ViolationKind::Immutable, IMMUTABLE_MESSAGE);
            }
        }
        Operation::None => {}
    }
}

fn trim_in_place(text: &mut String) {
    let trimmed = text.trim();
    if trimmed.len() != text.len() {
        *text = trimmed.to_string();
    }
}
