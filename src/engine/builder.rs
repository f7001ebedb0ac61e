/* src/engine/builder.rs */

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;

use super::{BreakingPredicate, EngineError, FailurePolicy, Ghii};
use crate::events::EventBus;
use crate::history::History;
use crate::loader::{LoadError, Loader, LoaderRegistry, loader_fn};
use crate::schema::Schema;
use crate::tree::Tree;

/// Builder for the [`Ghii`] engine.
pub struct GhiiBuilder<S> {
	schema: S,
	loaders: Vec<Arc<dyn Loader>>,
	policy: FailurePolicy,
	breaking: Vec<(String, BreakingPredicate)>,
	#[cfg(feature = "events")]
	event_capacity: Option<usize>,
}

impl<S> GhiiBuilder<S>
where
	S: Schema,
{
	pub fn new(schema: S) -> Self {
		Self {
			schema,
			loaders: Vec::new(),
			policy: FailurePolicy::default(),
			breaking: Vec::new(),
			#[cfg(feature = "events")]
			event_capacity: None,
		}
	}

	/// Appends a loader; later loaders win field conflicts.
	pub fn loader(mut self, loader: impl Loader + 'static) -> Self {
		self.loaders.push(Arc::new(loader));
		self
	}

	/// Appends an async closure as a loader.
	pub fn loader_fn<F, Fut>(self, f: F) -> Self
	where
		F: Fn() -> Fut + Send + Sync + 'static,
		Fut: Future<Output = Result<Tree, LoadError>> + Send + 'static,
	{
		self.loader(loader_fn(f))
	}

	pub fn failure_policy(mut self, policy: FailurePolicy) -> Self {
		self.policy = policy;
		self
	}

	/// Registers a breaking-change predicate for a top-level section.
	///
	/// Evaluated on every publication that follows an earlier one, with the
	/// old and new section values (`Value::Null` when absent).
	pub fn breaking_change<F>(mut self, section: impl Into<String>, predicate: F) -> Self
	where
		F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
	{
		self.breaking.push((section.into(), Arc::new(predicate)));
		self
	}

	/// Sets the capacity of the async event channel.
	#[cfg(feature = "events")]
	pub fn event_capacity(mut self, capacity: usize) -> Self {
		self.event_capacity = Some(capacity);
		self
	}

	pub fn build(self) -> Result<Ghii<S>, EngineError> {
		if self.breaking.iter().any(|(section, _)| section.is_empty()) {
			return Err(EngineError::Builder(
				"breaking-change section name must not be empty".to_string(),
			));
		}

		let loaders = LoaderRegistry::new();
		for loader in self.loaders {
			loaders.register(loader);
		}

		#[cfg(feature = "events")]
		let events = match self.event_capacity {
			Some(0) => {
				return Err(EngineError::Builder(
					"event capacity must be greater than zero".to_string(),
				));
			}
			Some(capacity) => EventBus::with_capacity(capacity),
			None => EventBus::new(),
		};
		#[cfg(not(feature = "events"))]
		let events = EventBus::new();

		Ok(Ghii {
			schema: self.schema,
			loaders,
			history: History::new(),
			events,
			policy: self.policy,
			breaking: self.breaking,
		})
	}
}
