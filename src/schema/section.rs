/* src/schema/section.rs */

use async_trait::async_trait;

use super::{Field, Schema, Violation};
use crate::tree::Tree;

/// A schema made of named top-level sections.
///
/// Each section carries its own defaults and constraints. Sections not
/// declared here pass through unchecked unless [`deny_unknown`] is set.
///
/// [`deny_unknown`]: SectionSchema::deny_unknown
#[derive(Debug, Clone)]
pub struct SectionSchema {
	root: Field,
}

impl SectionSchema {
	pub fn new() -> Self {
		Self {
			root: Field::object(),
		}
	}

	/// Declares a section. Re-declaring a name replaces the previous one.
	pub fn section(mut self, name: impl Into<String>, field: Field) -> Self {
		self.root = self.root.field(name, field);
		self
	}

	/// Rejects sections that were not declared.
	pub fn deny_unknown(mut self) -> Self {
		self.root = self.root.deny_unknown();
		self
	}
}

impl Default for SectionSchema {
	fn default() -> Self {
		Self::new()
	}
}

#[async_trait]
impl Schema for SectionSchema {
	fn defaults(&self) -> Tree {
		self.root.nested_defaults()
	}

	async fn validate(&self, tree: &Tree) -> Result<(), Vec<Violation>> {
		let mut violations = Vec::new();
		self.root.check_object("", tree, &mut violations);
		if violations.is_empty() {
			Ok(())
		} else {
			Err(violations)
		}
	}
}
