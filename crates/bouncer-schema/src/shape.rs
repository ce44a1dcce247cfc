//! # Resource Shapes
//!
//! A resource shape is a plain Rust struct that can be decoded from JSON
//! and walked by the validator. Instead of runtime reflection, each shape
//! implements two small traits by hand:
//!
//! - [`Fields`] maps an internal field name to a [`FieldMut`] view of the
//!   field's current value (mutable text so it can be trimmed, a zero check
//!   for other leaves, or a nested structure to recurse into).
//! - [`Shape`] supplies the [`Schema`] and ties in the serde bounds.
//!
//! ```
//! use bouncer_schema::{FieldMut, FieldRule, Fields, Schema, Shape};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
//! #[serde(default)]
//! struct Note {
//!     title: String,
//!     pinned: bool,
//! }
//!
//! impl Fields for Note {
//!     fn field_mut(&mut self, name: &str) -> Option<FieldMut<'_>> {
//!         match name {
//!             "title" => Some(FieldMut::Text(&mut self.title)),
//!             "pinned" => Some(FieldMut::Value(&self.pinned)),
//!             _ => None,
//!         }
//!     }
//! }
//!
//! impl Shape for Note {
//!     fn schema() -> Schema {
//!         Schema::new("Note")
//!             .field(FieldRule::scalar("title").required_on_create())
//!             .field(FieldRule::scalar("pinned"))
//!     }
//! }
//! ```
//!
//! Shapes should carry `#[serde(default)]` so that omitted keys decode to
//! their zero value instead of failing deserialization.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::SchemaError;
use crate::rule::{FieldRule, ValueKind};
use crate::schema::Schema;

/// Structural comparison against a type's zero value.
pub trait IsZero {
    /// Whether the value equals the type's `Default`.
    fn is_zero(&self) -> bool;
}

impl<T: Default + PartialEq> IsZero for T {
    fn is_zero(&self) -> bool {
        *self == T::default()
    }
}

/// A view of one field's current value.
pub enum FieldMut<'a> {
    /// Text, trimmed in place unless the rule disables it.
    Text(&'a mut String),
    /// Any other leaf or collection; only its zero-ness matters.
    Value(&'a dyn IsZero),
    /// An embedded structure.
    Nested(&'a mut dyn Fields),
    /// An optional embedded structure; `None` is its zero value.
    OptionalNested(Option<&'a mut dyn Fields>),
}

impl FieldMut<'_> {
    /// Name of the view variant, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Value(_) => "value",
            Self::Nested(_) => "nested",
            Self::OptionalNested(_) => "optional-nested",
        }
    }

    /// Whether this view can back a rule of `kind`.
    pub fn fits(&self, kind: ValueKind) -> bool {
        matches!(
            (kind, self),
            (ValueKind::Scalar, Self::Text(_) | Self::Value(_))
                | (ValueKind::Sequence, Self::Value(_))
                | (ValueKind::Nested, Self::Nested(_))
                | (ValueKind::OptionalNested, Self::OptionalNested(_))
        )
    }
}

/// Name-based field access for the validator.
pub trait Fields: IsZero {
    /// Returns a view of the field with internal name `name`, or `None`
    /// if the type has no such field.
    fn field_mut(&mut self, name: &str) -> Option<FieldMut<'_>>;
}

/// A top-level resource shape.
///
/// Only owned, `'static` value types can be shapes, so a reference or
/// pointer can never be registered as one.
pub trait Shape: Fields + Default + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The rule table for this shape.
    fn schema() -> Schema;
}

/// Resolve `rule` on `target`, checking the view matches the declared kind.
pub(crate) fn access<'a>(
    schema: &Schema,
    rule: &FieldRule,
    target: &'a mut dyn Fields,
) -> Result<FieldMut<'a>, SchemaError> {
    let field = target
        .field_mut(rule.name())
        .ok_or_else(|| SchemaError::MissingAccessor {
            shape: schema.shape().to_string(),
            field: rule.name().to_string(),
        })?;

    if !field.fits(rule.kind()) {
        return Err(SchemaError::KindMismatch {
            shape: schema.shape().to_string(),
            field: rule.name().to_string(),
            declared: rule.kind().to_string(),
            actual: field.kind_name().to_string(),
        });
    }

    Ok(field)
}

/// Walk every non-skipped rule against a zero-valued instance, confirming
/// each declared field has an accessor of the right kind.
///
/// Optional nested structures are `None` at zero and are checked only
/// when populated, by the validator.
pub(crate) fn probe(schema: &Schema, target: &mut dyn Fields) -> Result<(), SchemaError> {
    for rule in schema.fields().iter().filter(|r| !r.is_skipped()) {
        if let FieldMut::Nested(nested) = access(schema, rule, &mut *target)? {
            probe(schema.nested_of(rule)?, nested)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default, PartialEq)]
    struct Inner {
        name: String,
    }

    impl Fields for Inner {
        fn field_mut(&mut self, name: &str) -> Option<FieldMut<'_>> {
            match name {
                "name" => Some(FieldMut::Text(&mut self.name)),
                _ => None,
            }
        }
    }

    #[derive(Debug, Default, PartialEq)]
    struct Outer {
        title: String,
        count: u32,
        tags: Vec<String>,
        inner: Inner,
        maybe: Option<Inner>,
    }

    impl Fields for Outer {
        fn field_mut(&mut self, name: &str) -> Option<FieldMut<'_>> {
            match name {
                "title" => Some(FieldMut::Text(&mut self.title)),
                "count" => Some(FieldMut::Value(&self.count)),
                "tags" => Some(FieldMut::Value(&self.tags)),
                "inner" => Some(FieldMut::Nested(&mut self.inner)),
                "maybe" => Some(FieldMut::OptionalNested(
                    self.maybe.as_mut().map(|m| m as &mut dyn Fields),
                )),
                _ => None,
            }
        }
    }

    fn inner_schema() -> Schema {
        Schema::new("Inner").field(FieldRule::scalar("name"))
    }

    fn outer_schema() -> Schema {
        Schema::new("Outer")
            .field(FieldRule::scalar("title"))
            .field(FieldRule::scalar("count"))
            .field(FieldRule::sequence("tags"))
            .field(FieldRule::nested("inner", inner_schema()))
            .field(FieldRule::optional_nested("maybe", inner_schema()))
    }

    #[test]
    fn is_zero_is_structural() {
        assert!(0u32.is_zero());
        assert!(String::new().is_zero());
        assert!(Vec::<u8>::new().is_zero());
        assert!(Option::<bool>::None.is_zero());
        assert!(!Some(false).is_zero());
        assert!(Outer::default().is_zero());

        let mut outer = Outer::default();
        outer.inner.name = "x".into();
        assert!(!outer.is_zero());
    }

    #[test]
    fn probe_accepts_matching_type() {
        probe(&outer_schema(), &mut Outer::default()).unwrap();
    }

    #[test]
    fn probe_reports_missing_accessor() {
        let schema = outer_schema().field(FieldRule::scalar("ghost"));
        assert_eq!(
            probe(&schema, &mut Outer::default()).unwrap_err(),
            SchemaError::MissingAccessor {
                shape: "Outer".into(),
                field: "ghost".into()
            }
        );
    }

    #[test]
    fn probe_skips_skipped_rules() {
        let schema = outer_schema().field(FieldRule::scalar("ghost").skip());
        probe(&schema, &mut Outer::default()).unwrap();
    }

    #[test]
    fn probe_reports_kind_mismatch() {
        let schema = Schema::new("Outer").field(FieldRule::sequence("title"));
        assert!(matches!(
            probe(&schema, &mut Outer::default()),
            Err(SchemaError::KindMismatch { declared, actual, .. })
                if declared == "sequence" && actual == "text"
        ));
    }

    #[test]
    fn probe_recurses_into_nested() {
        let broken_inner = Schema::new("Inner").field(FieldRule::scalar("nickname"));
        let schema = Schema::new("Outer").field(FieldRule::nested("inner", broken_inner));
        assert!(matches!(
            probe(&schema, &mut Outer::default()),
            Err(SchemaError::MissingAccessor { shape, field })
                if shape == "Inner" && field == "nickname"
        ));
    }

    #[test]
    fn fits_matrix() {
        let mut s = String::new();
        assert!(FieldMut::Text(&mut s).fits(ValueKind::Scalar));
        assert!(!FieldMut::Text(&mut s).fits(ValueKind::Sequence));
        assert!(FieldMut::Value(&0u8).fits(ValueKind::Sequence));
        assert!(FieldMut::OptionalNested(None).fits(ValueKind::OptionalNested));
        assert!(!FieldMut::OptionalNested(None).fits(ValueKind::Nested));
    }
}
