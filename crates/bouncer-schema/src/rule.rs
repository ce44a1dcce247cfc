//! # Field Rules
//!
//! A [`FieldRule`] describes one field of a resource shape: how it is named
//! on the wire, what kind of value it holds, and which [`Modifier`]s govern
//! it per operation.
//!
//! Modifiers are an explicit set and compose freely. A rule may be
//! required on create *and* immutable on update:
//!
//! ```
//! use bouncer_schema::FieldRule;
//!
//! let rule = FieldRule::scalar("title")
//!     .required_on_create()
//!     .immutable_on_update();
//! assert!(rule.trims());
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::SchemaError;
use crate::schema::Schema;

/// The kind of value a field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// A leaf value: text, number, boolean, or an optional of one.
    Scalar,
    /// An embedded structure, always present.
    Nested,
    /// An embedded structure that may be absent.
    OptionalNested,
    /// An ordered collection. Validated as a whole, never per element.
    Sequence,
}

impl ValueKind {
    /// Returns the kind name used in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Nested => "nested",
            Self::OptionalNested => "optional-nested",
            Self::Sequence => "sequence",
        }
    }

    /// Whether rules of this kind must carry a nested schema.
    pub fn is_structure(&self) -> bool {
        matches!(self, Self::Nested | Self::OptionalNested)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A per-field rule modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    /// Create requests must supply a non-zero value.
    RequiredOnCreate,
    /// Create requests must leave the field at its zero value.
    ImmutableOnCreate,
    /// Update requests must leave the field at its zero value.
    ImmutableOnUpdate,
    /// Text values are kept verbatim instead of being whitespace-trimmed.
    NoTrim,
    /// The validator ignores the field entirely.
    Skip,
}

impl Modifier {
    /// Every modifier, in declaration order.
    pub const ALL: [Modifier; 5] = [
        Self::RequiredOnCreate,
        Self::ImmutableOnCreate,
        Self::ImmutableOnUpdate,
        Self::NoTrim,
        Self::Skip,
    ];

    /// Returns the canonical token for this modifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RequiredOnCreate => "required_on_create",
            Self::ImmutableOnCreate => "immutable_on_create",
            Self::ImmutableOnUpdate => "immutable_on_update",
            Self::NoTrim => "no_trim",
            Self::Skip => "skip",
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Modifier {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "required_on_create" | "required" => Ok(Self::RequiredOnCreate),
            "immutable_on_create" => Ok(Self::ImmutableOnCreate),
            "immutable_on_update" => Ok(Self::ImmutableOnUpdate),
            "no_trim" | "notrim" => Ok(Self::NoTrim),
            "skip" => Ok(Self::Skip),
            other => Err(SchemaError::UnknownModifier(other.to_string())),
        }
    }
}

/// A set of [`Modifier`]s.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers(u8);

impl Modifiers {
    /// The empty set.
    pub const fn new() -> Self {
        Self(0)
    }

    /// Parse a comma-separated modifier list such as
    /// `"required_on_create, immutable_on_update"`.
    ///
    /// Blank entries are ignored; unknown tokens are an error rather than
    /// being silently dropped.
    pub fn parse(list: &str) -> Result<Self, SchemaError> {
        list.split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(Modifier::from_str)
            .collect()
    }

    /// Returns the set with `modifier` added.
    #[must_use]
    pub fn with(mut self, modifier: Modifier) -> Self {
        self.insert(modifier);
        self
    }

    /// Add `modifier` to the set.
    pub fn insert(&mut self, modifier: Modifier) {
        self.0 |= modifier.bit();
    }

    /// Whether `modifier` is in the set.
    pub fn contains(&self, modifier: Modifier) -> bool {
        self.0 & modifier.bit() != 0
    }

    /// Returns true if no modifier is set.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Iterate the set in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Modifier> + '_ {
        Modifier::ALL.into_iter().filter(|m| self.contains(*m))
    }
}

impl FromIterator<Modifier> for Modifiers {
    fn from_iter<I: IntoIterator<Item = Modifier>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), Self::with)
    }
}

impl fmt::Display for Modifiers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, m) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{m}")?;
        }
        Ok(())
    }
}

/// Declarative rule for one field of a resource shape.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldRule {
    name: String,
    key: Option<String>,
    form: Option<String>,
    kind: ValueKind,
    modifiers: Modifiers,
    nested: Option<Box<Schema>>,
}

impl FieldRule {
    /// A rule of any kind with no modifiers and no nested schema.
    pub fn new(name: impl Into<String>, kind: ValueKind) -> Self {
        Self {
            name: name.into(),
            key: None,
            form: None,
            kind,
            modifiers: Modifiers::new(),
            nested: None,
        }
    }

    /// A leaf field.
    pub fn scalar(name: impl Into<String>) -> Self {
        Self::new(name, ValueKind::Scalar)
    }

    /// A collection field.
    pub fn sequence(name: impl Into<String>) -> Self {
        Self::new(name, ValueKind::Sequence)
    }

    /// An always-present embedded structure described by `schema`.
    pub fn nested(name: impl Into<String>, schema: Schema) -> Self {
        Self::new(name, ValueKind::Nested).with_nested(schema)
    }

    /// An optional embedded structure described by `schema`.
    pub fn optional_nested(name: impl Into<String>, schema: Schema) -> Self {
        Self::new(name, ValueKind::OptionalNested).with_nested(schema)
    }

    /// Attach a nested schema.
    #[must_use]
    pub fn with_nested(mut self, schema: Schema) -> Self {
        self.nested = Some(Box::new(schema));
        self
    }

    /// Set the external (serialization) key, when it differs from the name.
    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set the alternate form name.
    #[must_use]
    pub fn form(mut self, form: impl Into<String>) -> Self {
        self.form = Some(form.into());
        self
    }

    /// Add one modifier.
    #[must_use]
    pub fn with(mut self, modifier: Modifier) -> Self {
        self.modifiers.insert(modifier);
        self
    }

    /// Add every modifier in `modifiers`.
    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        for m in modifiers.iter() {
            self.modifiers.insert(m);
        }
        self
    }

    /// Reject creates that leave this field at its zero value.
    #[must_use]
    pub fn required_on_create(self) -> Self {
        self.with(Modifier::RequiredOnCreate)
    }

    /// Reject creates that supply this field.
    #[must_use]
    pub fn immutable_on_create(self) -> Self {
        self.with(Modifier::ImmutableOnCreate)
    }

    /// Reject updates that supply this field.
    #[must_use]
    pub fn immutable_on_update(self) -> Self {
        self.with(Modifier::ImmutableOnUpdate)
    }

    /// Keep surrounding whitespace in text values.
    #[must_use]
    pub fn no_trim(self) -> Self {
        self.with(Modifier::NoTrim)
    }

    /// Exclude this field from validation.
    #[must_use]
    pub fn skip(self) -> Self {
        self.with(Modifier::Skip)
    }

    /// Internal field name, used to look up the accessor.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name reported in violations: the external key, else the form
    /// name, else the internal name.
    pub fn display_name(&self) -> &str {
        self.key
            .as_deref()
            .or(self.form.as_deref())
            .unwrap_or(&self.name)
    }

    /// Declared value kind.
    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    /// All modifiers applied to this field.
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// Whether `modifier` applies to this field.
    pub fn has(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(modifier)
    }

    /// Whether text values of this field are whitespace-trimmed.
    pub fn trims(&self) -> bool {
        !self.has(Modifier::NoTrim)
    }

    /// Whether the validator ignores this field.
    pub fn is_skipped(&self) -> bool {
        self.has(Modifier::Skip)
    }

    /// The nested schema, for structure kinds.
    pub fn nested_schema(&self) -> Option<&Schema> {
        self.nested.as_deref()
    }
}
