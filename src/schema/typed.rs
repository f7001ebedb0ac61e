/* src/schema/typed.rs */

use std::marker::PhantomData;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::{Validate, ValidationErrors, ValidationErrorsKind};

use super::field::join;
use super::{Schema, Violation};
use crate::tree::Tree;

/// A schema backed by a Rust type deriving `Deserialize` and `Validate`.
///
/// The merged tree must deserialize into `T`; `validator` rules on `T`
/// then run and every failing rule becomes a [`Violation`].
pub struct TypedSchema<T> {
	defaults: Tree,
	_marker: PhantomData<fn() -> T>,
}

impl<T> TypedSchema<T>
where
	T: DeserializeOwned + Validate,
{
	pub fn new() -> Self {
		Self {
			defaults: Tree::new(),
			_marker: PhantomData,
		}
	}

	/// Sets the tree returned by [`Schema::defaults`].
	pub fn with_defaults(mut self, defaults: Tree) -> Self {
		self.defaults = defaults;
		self
	}
}

impl<T> Default for TypedSchema<T>
where
	T: DeserializeOwned + Validate,
{
	fn default() -> Self {
		Self::new()
	}
}

impl<T> std::fmt::Debug for TypedSchema<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TypedSchema")
			.field("type", &std::any::type_name::<T>())
			.field("defaults", &self.defaults)
			.finish()
	}
}

#[async_trait]
impl<T> Schema for TypedSchema<T>
where
	T: DeserializeOwned + Validate,
{
	fn defaults(&self) -> Tree {
		self.defaults.clone()
	}

	async fn validate(&self, tree: &Tree) -> Result<(), Vec<Violation>> {
		let typed: T = serde_json::from_value(Value::Object(tree.clone()))
			.map_err(|e| vec![Violation::new("", e.to_string(), Value::Null)])?;

		typed.validate().map_err(|errors| {
			let mut violations = Vec::new();
			flatten("", &errors, &mut violations);
			violations.sort_by(|a, b| a.path.cmp(&b.path));
			violations
		})
	}
}

fn flatten(path: &str, errors: &ValidationErrors, out: &mut Vec<Violation>) {
	for (field, kind) in errors.errors() {
		let path = join(path, &field.to_string());
		match kind {
			ValidationErrorsKind::Field(list) => {
				for error in list {
					let reason = match &error.message {
						Some(message) => message.to_string(),
						None => error.code.to_string(),
					};
					let value = error.params.get("value").cloned().unwrap_or(Value::Null);
					out.push(Violation::new(path.clone(), reason, value));
				}
			}
			ValidationErrorsKind::Struct(inner) => flatten(&path, inner, out),
			ValidationErrorsKind::List(items) => {
				for (index, inner) in items {
					flatten(&join(&path, &index.to_string()), inner, out);
				}
			}
		}
	}
}
