/* src/loader/registry.rs */

use std::sync::Arc;

use arc_swap::ArcSwap;
use futures_util::future::join_all;

use super::{Loader, LoaderFailure};
use crate::tree::Tree;

/// Ordered collection of loaders.
///
/// Registration order is merge priority: later loaders override earlier
/// ones. It does not constrain execution, all loaders run concurrently.
pub struct LoaderRegistry {
	loaders: ArcSwap<Vec<Arc<dyn Loader>>>,
}

impl LoaderRegistry {
	pub fn new() -> Self {
		Self {
			loaders: ArcSwap::from_pointee(Vec::new()),
		}
	}

	/// Appends a loader. It wins field conflicts over every loader
	/// registered before it.
	pub fn register(&self, loader: Arc<dyn Loader>) {
		self.loaders.rcu(|current| {
			let mut next = (**current).clone();
			next.push(Arc::clone(&loader));
			next
		});
	}

	pub fn len(&self) -> usize {
		self.loaders.load().len()
	}

	pub fn is_empty(&self) -> bool {
		self.loaders.load().is_empty()
	}

	/// Starts every loader, then waits for all of them to settle.
	///
	/// Results are returned in registration order regardless of completion
	/// order. A failing loader never cancels the others.
	pub async fn run_all(&self) -> Vec<Result<Tree, LoaderFailure>> {
		let loaders = self.loaders.load_full();
		let pending = loaders.iter().map(|loader| loader.load());
		let settled = join_all(pending).await;

		settled
			.into_iter()
			.zip(loaders.iter())
			.enumerate()
			.map(|(index, (result, loader))| {
				result.map_err(|error| LoaderFailure {
					index,
					name: loader.name().map(str::to_string),
					error,
				})
			})
			.collect()
	}
}

impl Default for LoaderRegistry {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for LoaderRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let loaders = self.loaders.load();
		let names: Vec<&str> = loaders
			.iter()
			.map(|loader| loader.name().unwrap_or("<anonymous>"))
			.collect();
		f.debug_struct("LoaderRegistry").field("loaders", &names).finish()
	}
}
