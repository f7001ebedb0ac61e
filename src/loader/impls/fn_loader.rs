/* src/loader/impls/fn_loader.rs */

use std::future::Future;

use async_trait::async_trait;

use super::super::{LoadError, Loader};
use crate::tree::Tree;

/// A loader backed by an async closure. Created with [`loader_fn`].
pub struct FnLoader<F> {
	f: F,
	name: Option<String>,
}

/// Wraps an async closure into a [`Loader`].
///
/// ```ignore
/// let loader = loader_fn(|| async { Ok(Tree::new()) }).named("empty");
/// ```
pub fn loader_fn<F, Fut>(f: F) -> FnLoader<F>
where
	F: Fn() -> Fut + Send + Sync + 'static,
	Fut: Future<Output = Result<Tree, LoadError>> + Send + 'static,
{
	FnLoader { f, name: None }
}

impl<F> FnLoader<F> {
	/// Sets the name used to attribute failures.
	pub fn named(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());
		self
	}
}

#[async_trait]
impl<F, Fut> Loader for FnLoader<F>
where
	F: Fn() -> Fut + Send + Sync + 'static,
	Fut: Future<Output = Result<Tree, LoadError>> + Send + 'static,
{
	async fn load(&self) -> Result<Tree, LoadError> {
		(self.f)().await
	}

	fn name(&self) -> Option<&str> {
		self.name.as_deref()
	}
}

impl<F> std::fmt::Debug for FnLoader<F> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("FnLoader").field("name", &self.name).finish_non_exhaustive()
	}
}
