//! Integration tests: create and update validation over fixture shapes,
//! and the validate-then-merge path for partial updates.
//!
//! `Foo` and `Person` cover the common scenarios: a required field, a
//! create-immutable field, an update-immutable field, a skipped field,
//! and a nested structure with its own required field.

use bouncer_core::{Operation, ViolationKind};
use bouncer_schema::{Bouncer, FieldMut, FieldRule, Fields, Schema, Shape};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct Foo {
    title: String,
    content: String,
    #[serde(skip)]
    ignored: String,
    create_ignored: String,
}

impl Fields for Foo {
    fn field_mut(&mut self, name: &str) -> Option<FieldMut<'_>> {
        match name {
            "title" => Some(FieldMut::Text(&mut self.title)),
            "content" => Some(FieldMut::Text(&mut self.content)),
            "ignored" => Some(FieldMut::Text(&mut self.ignored)),
            "create_ignored" => Some(FieldMut::Text(&mut self.create_ignored)),
            _ => None,
        }
    }
}

impl Shape for Foo {
    fn schema() -> Schema {
        Schema::new("Foo")
            .field(FieldRule::scalar("title").required_on_create().immutable_on_update())
            .field(FieldRule::scalar("content"))
            .field(FieldRule::scalar("ignored").skip())
            .field(FieldRule::scalar("create_ignored").immutable_on_create())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct Person {
    name: String,
    email: String,
}

impl Fields for Person {
    fn field_mut(&mut self, name: &str) -> Option<FieldMut<'_>> {
        match name {
            "name" => Some(FieldMut::Text(&mut self.name)),
            "email" => Some(FieldMut::Text(&mut self.email)),
            _ => None,
        }
    }
}

impl Shape for Person {
    fn schema() -> Schema {
        Schema::new("Person")
            .field(FieldRule::scalar("name").required_on_create())
            .field(FieldRule::scalar("email"))
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct Post {
    #[serde(rename = "headline")]
    title: String,
    author: Option<Person>,
    tags: Vec<String>,
    published: Option<bool>,
}

impl Fields for Post {
    fn field_mut(&mut self, name: &str) -> Option<FieldMut<'_>> {
        match name {
            "title" => Some(FieldMut::Text(&mut self.title)),
            "author" => Some(FieldMut::OptionalNested(
                self.author.as_mut().map(|p| p as &mut dyn Fields),
            )),
            "tags" => Some(FieldMut::Value(&self.tags)),
            "published" => Some(FieldMut::Value(&self.published)),
            _ => None,
        }
    }
}

impl Shape for Post {
    fn schema() -> Schema {
        Schema::new("Post")
            .field(FieldRule::scalar("title").key("headline").required_on_create())
            .field(FieldRule::optional_nested("author", Person::schema()))
            .field(FieldRule::sequence("tags").required_on_create())
            .field(FieldRule::scalar("published").immutable_on_create())
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
struct Loose {
    note: String,
    count: i64,
}

impl Fields for Loose {
    fn field_mut(&mut self, name: &str) -> Option<FieldMut<'_>> {
        match name {
            "note" => Some(FieldMut::Text(&mut self.note)),
            "count" => Some(FieldMut::Value(&self.count)),
            _ => None,
        }
    }
}

impl Shape for Loose {
    fn schema() -> Schema {
        Schema::new("Loose")
            .field(FieldRule::scalar("note"))
            .field(FieldRule::scalar("count"))
    }
}

fn field_names(violations: &bouncer_core::Violations) -> Vec<String> {
    violations.iter().map(|v| v.path()).collect()
}

// -- Create -------------------------------------------------------------------

#[test]
fn create_foo() {
    let out = Bouncer::<Foo>::new()
        .unwrap()
        .validate(br#"{"title":"Foo Title", "content": "Foo Content"}"#, Operation::Create)
        .unwrap();
    assert!(out.is_valid(), "{}", out.violations);
}

#[test]
fn create_missing_required_field_reports_exactly_one_required_error() {
    let out = Bouncer::<Foo>::new()
        .unwrap()
        .validate(br#"{"content":"x"}"#, Operation::Create)
        .unwrap();
    assert_eq!(out.violations.len(), 1);
    let v = &out.violations.violations()[0];
    assert_eq!(v.kind, ViolationKind::Required);
    assert_eq!(v.field, vec!["title"]);
}

#[test]
fn create_with_immutable_field_reports_immutable_error() {
    let out = Bouncer::<Foo>::new()
        .unwrap()
        .validate(
            br#"{"title":"Foo Title", "content": "Foo Content", "create_ignored":"bar"}"#,
            Operation::Create,
        )
        .unwrap();
    assert_eq!(out.violations.len(), 1);
    assert_eq!(out.violations.violations()[0].kind, ViolationKind::Immutable);
    assert_eq!(field_names(&out.violations), vec!["create_ignored"]);
}

#[test]
fn create_immutable_only_shape_reports_single_immutable_error() {
    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct Titled {
        title: String,
    }

    impl Fields for Titled {
        fn field_mut(&mut self, name: &str) -> Option<FieldMut<'_>> {
            match name {
                "title" => Some(FieldMut::Text(&mut self.title)),
                _ => None,
            }
        }
    }

    impl Shape for Titled {
        fn schema() -> Schema {
            Schema::new("Titled").field(FieldRule::scalar("title").immutable_on_create())
        }
    }

    let out = Bouncer::<Titled>::new()
        .unwrap()
        .validate(br#"{"title":"t"}"#, Operation::Create)
        .unwrap();
    assert_eq!(out.violations.len(), 1);
    assert_eq!(out.violations.violations()[0].kind, ViolationKind::Immutable);
    assert_eq!(field_names(&out.violations), vec!["title"]);
}

#[test]
fn empty_body_on_shape_without_required_fields_is_zero_value() {
    let out = Bouncer::<Loose>::new()
        .unwrap()
        .validate(b"", Operation::Create)
        .unwrap();
    assert!(out.is_valid());
    assert_eq!(out.instance, Loose::default());
}

#[test]
fn required_errors_use_external_key() {
    let out = Bouncer::<Post>::new()
        .unwrap()
        .validate(br#"{}"#, Operation::Create)
        .unwrap();
    assert_eq!(field_names(&out.violations), vec!["headline", "tags"]);
    assert!(out.violations.iter().all(|v| v.kind == ViolationKind::Required));
}

#[test]
fn explicit_false_counts_as_supplied_for_optional_scalars() {
    let out = Bouncer::<Post>::new()
        .unwrap()
        .validate(
            br#"{"headline":"h","tags":["a"],"published":false}"#,
            Operation::Create,
        )
        .unwrap();
    assert_eq!(field_names(&out.violations), vec!["published"]);
}

#[test]
fn nested_violations_carry_full_path() {
    let out = Bouncer::<Post>::new()
        .unwrap()
        .validate(
            br#"{"headline":"h","tags":["a"],"author":{"email":" e@x.io "}}"#,
            Operation::Create,
        )
        .unwrap();
    assert_eq!(field_names(&out.violations), vec!["author.name"]);
    assert_eq!(out.instance.author.unwrap().email, "e@x.io");
}

#[test]
fn malformed_body_yields_deserialization_error() {
    let out = Bouncer::<Loose>::new()
        .unwrap()
        .validate(br#"{"note": }"#, Operation::Create)
        .unwrap();
    assert_eq!(out.violations.len(), 1);
    let v = &out.violations.violations()[0];
    assert_eq!(v.kind, ViolationKind::Deserialization);
    assert!(v.field.is_empty());
}

// -- Update -------------------------------------------------------------------

#[test]
fn patch_foo() {
    let out = Bouncer::<Foo>::new()
        .unwrap()
        .validate(br#"{"content": "New Foo Content"}"#, Operation::Update)
        .unwrap();
    assert!(out.is_valid(), "{}", out.violations);
}

#[test]
fn patch_with_immutable_field_fails() {
    let out = Bouncer::<Foo>::new()
        .unwrap()
        .validate(br#"{"title":"Foo Title", "content": "Foo Content"}"#, Operation::Update)
        .unwrap();
    assert_eq!(field_names(&out.violations), vec!["title"]);
    assert_eq!(out.violations.violations()[0].kind, ViolationKind::Immutable);
}

#[test]
fn update_never_requires_fields() {
    let out = Bouncer::<Post>::new()
        .unwrap()
        .validate(br#"{"author":{}}"#, Operation::Update)
        .unwrap();
    assert!(out.is_valid(), "{}", out.violations);
}

#[test]
fn other_operations_decode_without_rules() {
    let out = Bouncer::<Foo>::new()
        .unwrap()
        .validate(br#"{"create_ignored":"x"}"#, Operation::None)
        .unwrap();
    assert!(out.is_valid());
    assert_eq!(out.instance.create_ignored, "x");
}

// -- Validate and merge -------------------------------------------------------

#[test]
fn merge_drops_zero_filled_and_unknown_keys() {
    let out = Bouncer::<Post>::new()
        .unwrap()
        .validate_and_merge(br#"{"headline":"  Fresh  ","unknown":1}"#, Operation::Update)
        .unwrap();
    assert!(out.is_valid(), "{}", out.violations);
    let doc: Value = serde_json::from_slice(&out.document).unwrap();
    assert_eq!(doc, json!({"headline": "Fresh"}));
}

#[test]
fn merge_keeps_nested_keys_the_client_sent() {
    let out = Bouncer::<Post>::new()
        .unwrap()
        .validate_and_merge(
            br#"{"author":{"name":" Ann ","extra":1},"tags":[" x "]}"#,
            Operation::Update,
        )
        .unwrap();
    let doc: Value = serde_json::from_slice(&out.document).unwrap();
    assert_eq!(doc, json!({"author": {"name": "Ann"}, "tags": [" x "]}));
}

#[test]
fn merge_reports_immutable_update_before_merging() {
    let out = Bouncer::<Foo>::new()
        .unwrap()
        .validate_and_merge(br#"{"title":"x"}"#, Operation::Update)
        .unwrap();
    assert!(out.violations.has(ViolationKind::Immutable));
    assert!(out.document.is_empty());
}
