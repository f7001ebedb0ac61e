/* src/loader/impls/source_loader.rs */

use async_trait::async_trait;

use super::super::{Format, LoadError, Loader, Source};
use crate::tree::Tree;

/// A zero-cost loader that combines a specific Source and Format at compile time.
pub struct SourceLoader<S, F> {
	pub source: S,
	pub format: F,
	pub key: String,
}

impl<S, F> SourceLoader<S, F>
where
	S: Source,
	F: Format,
{
	/// Creates a new SourceLoader reading `key` from `source`.
	pub fn new(source: S, format: F, key: impl Into<String>) -> Self {
		Self {
			source,
			format,
			key: key.into(),
		}
	}
}

#[async_trait]
impl<S, F> Loader for SourceLoader<S, F>
where
	S: Source,
	F: Format,
{
	async fn load(&self) -> Result<Tree, LoadError> {
		let bytes = self.source.read(&self.key).await?;
		self.format.parse::<Tree>(&bytes)
	}

	fn name(&self) -> Option<&str> {
		Some(&self.key)
	}
}
