/* tests/schema_tests.rs */

use ghii::schema::{Field, Schema, SectionSchema};
use ghii::tree::Tree;
use serde_json::{Value, json};

fn tree(value: Value) -> Tree {
	match value {
		Value::Object(map) => map,
		other => panic!("expected an object, got {}", other),
	}
}

fn foo_schema() -> SectionSchema {
	SectionSchema::new()
		.section(
			"foo",
			Field::object()
				.field("prop", Field::string().required())
				.with_default(json!({ "prop": "ciao" })),
		)
		.section(
			"s3",
			Field::object()
				.field("url", Field::string().required())
				.field("ciao", Field::string().with_default(json!("world"))),
		)
}

#[test]
fn test_defaults_are_derived_per_section() {
	let defaults = foo_schema().defaults();
	assert_eq!(
		Value::Object(defaults),
		json!({ "foo": { "prop": "ciao" }, "s3": { "ciao": "world" } })
	);
}

#[test]
fn test_fields_without_defaults_stay_absent() {
	let schema = SectionSchema::new().section("a", Field::object().field("x", Field::integer()));
	assert!(schema.defaults().is_empty());
}

#[test]
fn test_explicit_default_wins_over_nested() {
	let schema = SectionSchema::new().section(
		"a",
		Field::object()
			.field("x", Field::integer().with_default(json!(1)))
			.field("y", Field::integer().with_default(json!(1)))
			.with_default(json!({ "y": 2 })),
	);
	assert_eq!(Value::Object(schema.defaults()), json!({ "a": { "x": 1, "y": 2 } }));
}

#[tokio::test]
async fn test_valid_tree_passes() {
	let schema = foo_schema();
	let value = tree(json!({ "foo": { "prop": "ciao" }, "s3": { "url": "x", "ciao": "world" } }));
	assert!(schema.validate(&value).await.is_ok());
}

#[tokio::test]
async fn test_every_violation_is_reported() {
	let schema = SectionSchema::new()
		.section("name", Field::string().length(3, 5))
		.section("port", Field::integer().required())
		.section("mode", Field::string().one_of([json!("a"), json!("b")]))
		.section("tags", Field::array().items(Field::string()));

	let value = tree(json!({ "name": "ab", "mode": "c", "tags": ["ok", 7] }));
	let violations = schema.validate(&value).await.unwrap_err();

	let paths: Vec<&str> = violations.iter().map(|v| v.path.as_str()).collect();
	assert_eq!(paths, vec!["mode", "name", "port", "tags.1"]);
	assert_eq!(violations[0].value, json!("c"));
	assert_eq!(violations[2].reason, "is required");
	assert_eq!(violations[2].value, Value::Null);
	assert!(violations[3].reason.contains("expected string"));
}

#[tokio::test]
async fn test_type_mismatch_skips_nested_checks() {
	let schema = SectionSchema::new().section("foo", Field::object().field("prop", Field::string().required()));
	let violations = schema.validate(&tree(json!({ "foo": "flat" }))).await.unwrap_err();

	assert_eq!(violations.len(), 1);
	assert_eq!(violations[0].path, "foo");
	assert_eq!(violations[0].reason, "expected object, found string");
}

#[tokio::test]
async fn test_unknown_sections() {
	let open = SectionSchema::new().section("a", Field::any());
	assert!(open.validate(&tree(json!({ "a": 1, "b": 2 }))).await.is_ok());

	let closed = SectionSchema::new().section("a", Field::any()).deny_unknown();
	let violations = closed.validate(&tree(json!({ "a": 1, "b": 2 }))).await.unwrap_err();
	assert_eq!(violations.len(), 1);
	assert_eq!(violations[0].path, "b");
	assert_eq!(violations[0].to_string(), "b: is not a known field");
}

#[tokio::test]
async fn test_length_counts_chars() {
	let schema = SectionSchema::new().section("s", Field::string().max_len(2));
	assert!(schema.validate(&tree(json!({ "s": "éé" }))).await.is_ok());
	assert!(schema.validate(&tree(json!({ "s": "ééé" }))).await.is_err());
}

#[cfg(feature = "regex")]
#[tokio::test]
async fn test_pattern_constraint() {
	let schema = SectionSchema::new().section(
		"host",
		Field::string().pattern(fancy_regex::Regex::new(r"^[a-z]+\.local$").unwrap()),
	);
	assert!(schema.validate(&tree(json!({ "host": "db.local" }))).await.is_ok());

	let violations = schema.validate(&tree(json!({ "host": "DB" }))).await.unwrap_err();
	assert_eq!(violations[0].path, "host");
	assert!(violations[0].reason.starts_with("does not match pattern"));
}
