/* src/loader/impls/static_loader.rs */

use async_trait::async_trait;
use serde_json::Value;

use super::super::{LoadError, Loader};
use crate::schema::Kind;
use crate::tree::Tree;

/// A loader that always yields the same tree.
#[derive(Debug, Clone)]
pub struct StaticLoader {
	value: Value,
	name: Option<String>,
}

impl StaticLoader {
	pub fn new(tree: Tree) -> Self {
		Self::from_value(Value::Object(tree))
	}

	/// Wraps a JSON value. Loading fails with [`LoadError::NotATree`] unless
	/// it is an object.
	pub fn from_value(value: Value) -> Self {
		Self { value, name: None }
	}

	pub fn named(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}
}

#[async_trait]
impl Loader for StaticLoader {
	async fn load(&self) -> Result<Tree, LoadError> {
		match &self.value {
			Value::Object(tree) => Ok(tree.clone()),
			other => Err(LoadError::NotATree(Kind::of(other))),
		}
	}

	fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}
}
