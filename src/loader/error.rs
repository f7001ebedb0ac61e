/* src/loader/error.rs */

use std::path::PathBuf;

use crate::BoxError;

/// Core error type for the loader module.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
	/// Parsing error from format implementation.
	#[error("parse error: {0}")]
	Parse(String),

	/// Resource not found.
	#[error("not found: {0}")]
	NotFound(String),

	/// Path exists but is a directory or another non-file entry.
	#[error("not a file: {}", .0.display())]
	NotAFile(PathBuf),

	/// The loaded value is not an object, so it cannot be merged as a layer.
	#[error("expected an object at the root, found {0}")]
	NotATree(&'static str),

	/// No registered format handles the resource.
	#[error("unsupported format: {0}")]
	UnsupportedFormat(String),

	/// IO error from source.
	#[error("io error: {0}")]
	Io(#[from] std::io::Error),

	/// Sandbox violation in file system source.
	#[error("sandbox violation")]
	SandboxViolation,

	/// Generic error message.
	#[error("custom error: {0}")]
	Custom(String),

	/// Error raised by a caller-supplied loader.
	#[error(transparent)]
	Other(#[from] BoxError),
}

/// A loader failure attributed to the loader that produced it.
#[derive(Debug, thiserror::Error)]
#[error("loader #{index}{}: {error}", .name.as_deref().map(|n| format!(" ({})", n)).unwrap_or_default())]
pub struct LoaderFailure {
	/// Registration index of the loader.
	pub index: usize,
	/// Name reported by the loader, if any.
	pub name: Option<String>,
	#[source]
	pub error: LoadError,
}
