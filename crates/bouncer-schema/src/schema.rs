//! # Schema Model
//!
//! A [`Schema`] is the ordered rule table for one resource shape. It is a
//! pure description: no per-request state, cheap to clone, and safe to
//! share across threads once built.
//!
//! Schemas are authored next to the type they describe (see
//! [`Shape::schema`](crate::Shape::schema)) and checked once by
//! [`Schema::check`] when a [`Bouncer`](crate::Bouncer) is registered.

use std::collections::HashSet;

use crate::error::SchemaError;
use crate::rule::{FieldRule, Modifier};

/// Ordered field rules for one resource shape.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    shape: String,
    fields: Vec<FieldRule>,
}

impl Schema {
    /// Start an empty schema for the shape called `shape`.
    pub fn new(shape: impl Into<String>) -> Self {
        Self {
            shape: shape.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field rule. Declaration order is validation order.
    #[must_use]
    pub fn field(mut self, rule: FieldRule) -> Self {
        self.fields.push(rule);
        self
    }

    /// Name of the shape this schema describes.
    pub fn shape(&self) -> &str {
        &self.shape
    }

    /// All rules, in declaration order.
    pub fn fields(&self) -> &[FieldRule] {
        &self.fields
    }

    /// Look up a rule by internal field name.
    pub fn get(&self, name: &str) -> Option<&FieldRule> {
        self.fields.iter().find(|rule| rule.name() == name)
    }

    /// Returns the number of top-level rules.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if the schema declares no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Verify the schema is internally consistent, recursing into nested
    /// schemas.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] found, in declaration order.
    pub fn check(&self) -> Result<(), SchemaError> {
        let mut seen = HashSet::new();

        for rule in &self.fields {
            if rule.name().is_empty() {
                return Err(SchemaError::EmptyFieldName {
                    shape: self.shape.clone(),
                });
            }
            if !seen.insert(rule.name()) {
                return Err(SchemaError::DuplicateField {
                    shape: self.shape.clone(),
                    field: rule.name().to_string(),
                });
            }
            if rule.has(Modifier::RequiredOnCreate) && rule.has(Modifier::ImmutableOnCreate) {
                return Err(SchemaError::ConflictingModifiers {
                    shape: self.shape.clone(),
                    field: rule.name().to_string(),
                });
            }

            match (rule.kind().is_structure(), rule.nested_schema()) {
                (true, Some(nested)) => nested.check()?,
                (true, None) => {
                    return Err(SchemaError::MissingNestedSchema {
                        shape: self.shape.clone(),
                        field: rule.name().to_string(),
                        kind: rule.kind().to_string(),
                    })
                }
                (false, Some(_)) => {
                    return Err(SchemaError::UnexpectedNestedSchema {
                        shape: self.shape.clone(),
                        field: rule.name().to_string(),
                        kind: rule.kind().to_string(),
                    })
                }
                (false, None) => {}
            }
        }

        Ok(())
    }

    /// The nested schema of `rule`, which must belong to this schema.
    pub(crate) fn nested_of<'a>(&self, rule: &'a FieldRule) -> Result<&'a Schema, SchemaError> {
        rule.nested_schema()
            .ok_or_else(|| SchemaError::MissingNestedSchema {
                shape: self.shape.clone(),
                field: rule.name().to_string(),
                kind: rule.kind().to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::ValueKind;

    fn person() -> Schema {
        Schema::new("Person")
            .field(FieldRule::scalar("name").required_on_create())
            .field(FieldRule::scalar("email"))
    }

    #[test]
    fn fields_keep_declaration_order() {
        let schema = Schema::new("Foo")
            .field(FieldRule::scalar("title"))
            .field(FieldRule::scalar("content"))
            .field(FieldRule::nested("author", person()));
        let names: Vec<_> = schema.fields().iter().map(FieldRule::name).collect();
        assert_eq!(names, vec!["title", "content", "author"]);
        assert_eq!(schema.len(), 3);
        assert!(schema.get("author").is_some());
        assert!(schema.get("missing").is_none());
    }

    #[test]
    fn valid_schema_passes_check() {
        let schema = Schema::new("Article")
            .field(FieldRule::scalar("title").required_on_create().immutable_on_update())
            .field(FieldRule::optional_nested("author", person()))
            .field(FieldRule::sequence("tags"));
        schema.check().unwrap();
    }

    #[test]
    fn empty_schema_is_valid() {
        let schema = Schema::new("Empty");
        assert!(schema.is_empty());
        schema.check().unwrap();
    }

    #[test]
    fn duplicate_field_rejected() {
        let schema = Schema::new("Foo")
            .field(FieldRule::scalar("title"))
            .field(FieldRule::scalar("title").key("other"));
        assert_eq!(
            schema.check().unwrap_err(),
            SchemaError::DuplicateField {
                shape: "Foo".into(),
                field: "title".into()
            }
        );
    }

    #[test]
    fn empty_name_rejected() {
        let schema = Schema::new("Foo").field(FieldRule::scalar(""));
        assert!(matches!(schema.check(), Err(SchemaError::EmptyFieldName { .. })));
    }

    #[test]
    fn required_and_immutable_on_create_conflict() {
        let schema = Schema::new("Foo").field(
            FieldRule::scalar("title")
                .required_on_create()
                .immutable_on_create(),
        );
        assert!(matches!(
            schema.check(),
            Err(SchemaError::ConflictingModifiers { .. })
        ));
    }

    #[test]
    fn nested_kind_without_schema_rejected() {
        let schema = Schema::new("Foo").field(FieldRule::new("author", ValueKind::Nested));
        assert!(matches!(
            schema.check(),
            Err(SchemaError::MissingNestedSchema { .. })
        ));
    }

    #[test]
    fn scalar_with_schema_rejected() {
        let schema = Schema::new("Foo").field(FieldRule::scalar("title").with_nested(person()));
        assert!(matches!(
            schema.check(),
            Err(SchemaError::UnexpectedNestedSchema { .. })
        ));
    }

    #[test]
    fn nested_schema_errors_surface() {
        let broken = Schema::new("Person")
            .field(FieldRule::scalar("name"))
            .field(FieldRule::scalar("name"));
        let schema = Schema::new("Foo").field(FieldRule::nested("author", broken));
        assert_eq!(
            schema.check().unwrap_err(),
            SchemaError::DuplicateField {
                shape: "Person".into(),
                field: "name".into()
            }
        );
    }
}
