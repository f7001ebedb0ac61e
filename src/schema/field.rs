/* src/schema/field.rs */

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

use super::Violation;
use crate::tree::{Tree, merge};

/// JSON kind a field is expected to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Kind {
	#[default]
	Any,
	String,
	Integer,
	Number,
	Boolean,
	Object,
	Array,
}

impl Kind {
	fn accepts(self, value: &Value) -> bool {
		match self {
			Kind::Any => true,
			Kind::String => value.is_string(),
			Kind::Integer => value.is_i64() || value.is_u64(),
			Kind::Number => value.is_number(),
			Kind::Boolean => value.is_boolean(),
			Kind::Object => value.is_object(),
			Kind::Array => value.is_array(),
		}
	}

	pub(crate) fn of(value: &Value) -> &'static str {
		match value {
			Value::Null => "null",
			Value::Bool(_) => "boolean",
			Value::Number(n) if n.is_f64() => "number",
			Value::Number(_) => "integer",
			Value::String(_) => "string",
			Value::Array(_) => "array",
			Value::Object(_) => "object",
		}
	}
}

impl fmt::Display for Kind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Kind::Any => "any",
			Kind::String => "string",
			Kind::Integer => "integer",
			Kind::Number => "number",
			Kind::Boolean => "boolean",
			Kind::Object => "object",
			Kind::Array => "array",
		};
		f.write_str(name)
	}
}

/// Declarative description of one value in the tree.
///
/// Built with chained calls:
///
/// ```ignore
/// Field::object()
///     .field("host", Field::string().required().with_default(json!("localhost")))
///     .field("port", Field::integer().one_of([json!(80), json!(443)]))
/// ```
#[derive(Debug, Clone, Default)]
pub struct Field {
	kind: Kind,
	default: Option<Value>,
	required: bool,
	min_len: Option<usize>,
	max_len: Option<usize>,
	one_of: Option<Vec<Value>>,
	#[cfg(feature = "regex")]
	pattern: Option<fancy_regex::Regex>,
	fields: BTreeMap<String, Field>,
	items: Option<Box<Field>>,
	deny_unknown: bool,
}

impl Field {
	pub fn new(kind: Kind) -> Self {
		Self {
			kind,
			..Self::default()
		}
	}

	pub fn any() -> Self {
		Self::new(Kind::Any)
	}

	pub fn string() -> Self {
		Self::new(Kind::String)
	}

	pub fn integer() -> Self {
		Self::new(Kind::Integer)
	}

	pub fn number() -> Self {
		Self::new(Kind::Number)
	}

	pub fn boolean() -> Self {
		Self::new(Kind::Boolean)
	}

	pub fn object() -> Self {
		Self::new(Kind::Object)
	}

	pub fn array() -> Self {
		Self::new(Kind::Array)
	}

	/// Value used when no loader provides one.
	pub fn with_default(mut self, value: Value) -> Self {
		self.default = Some(value);
		self
	}

	pub fn required(mut self) -> Self {
		self.required = true;
		self
	}

	/// Bounds the length of a string (in chars), array or object.
	pub fn length(mut self, min: usize, max: usize) -> Self {
		self.min_len = Some(min);
		self.max_len = Some(max);
		self
	}

	pub fn min_len(mut self, min: usize) -> Self {
		self.min_len = Some(min);
		self
	}

	pub fn max_len(mut self, max: usize) -> Self {
		self.max_len = Some(max);
		self
	}

	/// Restricts the value to an enumeration.
	pub fn one_of(mut self, values: impl IntoIterator<Item = Value>) -> Self {
		self.one_of = Some(values.into_iter().collect());
		self
	}

	/// Requires string values to match `pattern`.
	#[cfg(feature = "regex")]
	pub fn pattern(mut self, pattern: fancy_regex::Regex) -> Self {
		self.pattern = Some(pattern);
		self
	}

	/// Declares a nested field of an object.
	pub fn field(mut self, name: impl Into<String>, field: Field) -> Self {
		self.fields.insert(name.into(), field);
		self
	}

	/// Declares the shape of every element of an array.
	pub fn items(mut self, field: Field) -> Self {
		self.items = Some(Box::new(field));
		self
	}

	/// Rejects object keys that are not declared with [`Field::field`].
	pub fn deny_unknown(mut self) -> Self {
		self.deny_unknown = true;
		self
	}

	/// Derives the default for this field. An explicit default wins over
	/// the defaults of nested fields.
	pub(crate) fn derive_default(&self) -> Option<Value> {
		let nested = self.nested_defaults();
		match (&self.default, nested.is_empty()) {
			(Some(explicit), true) => Some(explicit.clone()),
			(Some(explicit), false) => Some(merge(&Value::Object(nested), explicit)),
			(None, false) => Some(Value::Object(nested)),
			(None, true) => None,
		}
	}

	pub(crate) fn nested_defaults(&self) -> Tree {
		self.fields
			.iter()
			.filter_map(|(name, field)| field.derive_default().map(|value| (name.clone(), value)))
			.collect()
	}

	pub(crate) fn check(&self, path: &str, value: Option<&Value>, out: &mut Vec<Violation>) {
		let Some(value) = value else {
			if self.required {
				out.push(Violation::new(path, "is required", Value::Null));
			}
			return;
		};

		if !self.kind.accepts(value) {
			out.push(Violation::new(
				path,
				format!("expected {}, found {}", self.kind, Kind::of(value)),
				value.clone(),
			));
			return;
		}

		self.check_length(path, value, out);

		if let Some(allowed) = &self.one_of
			&& !allowed.contains(value)
		{
			out.push(Violation::new(path, "is not one of the allowed values", value.clone()));
		}

		#[cfg(feature = "regex")]
		if let (Some(pattern), Value::String(s)) = (&self.pattern, value) {
			// A regex runtime error (backtrack limit) counts as a mismatch.
			if !pattern.is_match(s).unwrap_or(false) {
				out.push(Violation::new(
					path,
					format!("does not match pattern {}", pattern.as_str()),
					value.clone(),
				));
			}
		}

		match value {
			Value::Object(map) => self.check_object(path, map, out),
			Value::Array(elements) => {
				if let Some(items) = &self.items {
					for (i, element) in elements.iter().enumerate() {
						items.check(&join(path, &i.to_string()), Some(element), out);
					}
				}
			}
			_ => {}
		}
	}

	pub(crate) fn check_object(&self, path: &str, map: &Tree, out: &mut Vec<Violation>) {
		for (name, field) in &self.fields {
			field.check(&join(path, name), map.get(name), out);
		}

		if self.deny_unknown {
			for (key, value) in map {
				if !self.fields.contains_key(key) {
					out.push(Violation::new(join(path, key), "is not a known field", value.clone()));
				}
			}
		}
	}

	fn check_length(&self, path: &str, value: &Value, out: &mut Vec<Violation>) {
		if self.min_len.is_none() && self.max_len.is_none() {
			return;
		}
		let len = match value {
			Value::String(s) => s.chars().count(),
			Value::Array(a) => a.len(),
			Value::Object(o) => o.len(),
			_ => return,
		};
		if let Some(min) = self.min_len
			&& len < min
		{
			out.push(Violation::new(
				path,
				format!("length {} is below minimum {}", len, min),
				value.clone(),
			));
		}
		if let Some(max) = self.max_len
			&& len > max
		{
			out.push(Violation::new(
				path,
				format!("length {} is above maximum {}", len, max),
				value.clone(),
			));
		}
	}
}

pub(super) fn join(path: &str, key: &str) -> String {
	if path.is_empty() {
		key.to_string()
	} else {
		format!("{}.{}", path, key)
	}
}
