/* src/engine/error.rs */

use std::fmt::Display;
use std::time::Duration;

use thiserror::Error;

use crate::BoxError;
use crate::loader::LoaderFailure;
use crate::schema::Violation;

/// Errors that can occur in the snapshot engine.
#[derive(Debug, Error)]
pub enum EngineError {
	/// One or more loaders failed under the strict failure policy.
	#[error("{} loader(s) failed: {}", .0.len(), list(.0))]
	Loaders(Vec<LoaderFailure>),

	/// The merged tree was rejected by the schema.
	#[error("validation failed with {} violation(s): {}", .0.len(), list(.0))]
	Validation(Vec<Violation>),

	/// No snapshot became available before the deadline.
	#[error("timed out after {0:?} waiting for the first snapshot")]
	Timeout(Duration),

	/// The activation target failed after a snapshot became available.
	#[error("activation failed: {0}")]
	Activation(#[source] BoxError),

	#[error("Builder error: {0}")]
	Builder(String),
}

impl EngineError {
	/// Returns the violations of a validation failure.
	pub fn violations(&self) -> Option<&[Violation]> {
		match self {
			EngineError::Validation(violations) => Some(violations),
			_ => None,
		}
	}

	/// Returns the loader failures of a strict-policy failure.
	pub fn loader_failures(&self) -> Option<&[LoaderFailure]> {
		match self {
			EngineError::Loaders(failures) => Some(failures),
			_ => None,
		}
	}

	pub fn is_timeout(&self) -> bool {
		matches!(self, EngineError::Timeout(_))
	}
}

fn list<T: Display>(items: &[T]) -> String {
	items
		.iter()
		.map(ToString::to_string)
		.collect::<Vec<_>>()
		.join("; ")
}
