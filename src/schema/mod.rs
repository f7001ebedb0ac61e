/* src/schema/mod.rs */

//!
//! Schema contract used by the snapshot pipeline.
//!
//! - [`SectionSchema`] - declarative per-section fields with defaults
//! - [`TypedSchema`] - typed validation via `validator` (feature `validate`)

mod field;
mod section;
#[cfg(feature = "validate")]
mod typed;

pub use field::{Field, Kind};
pub use section::SectionSchema;
#[cfg(feature = "validate")]
pub use typed::TypedSchema;

use std::fmt;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::tree::Tree;

/// Describes the expected shape of a configuration tree.
#[async_trait]
pub trait Schema: Send + Sync {
	/// Builds a tree holding every schema-declared default. Fields without
	/// a default are left absent.
	fn defaults(&self) -> Tree;

	/// Checks `tree`, reporting every violated constraint.
	async fn validate(&self, tree: &Tree) -> Result<(), Vec<Violation>>;
}

/// A single violated constraint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
	/// Dotted path of the offending value. Empty for the root.
	pub path: String,
	pub reason: String,
	/// The offending value, `Value::Null` when it was missing.
	pub value: Value,
}

impl Violation {
	pub fn new(path: impl Into<String>, reason: impl Into<String>, value: Value) -> Self {
		Self {
			path: path.into(),
			reason: reason.into(),
			value,
		}
	}
}

impl fmt::Display for Violation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.path.is_empty() {
			write!(f, "<root>: {}", self.reason)
		} else {
			write!(f, "{}: {}", self.path, self.reason)
		}
	}
}
