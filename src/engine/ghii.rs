/* src/engine/ghii.rs */

//!
//! Engine state, publication and read access.

use std::sync::Arc;

use super::{BreakingPredicate, FailurePolicy, GhiiBuilder};
use crate::events::{BreakingChange, EventBus, Lifecycle, NewSnapshot, SubscriptionId};
use crate::history::{Appended, History, SnapshotVersion};
use crate::loader::{Loader, LoaderRegistry};
use crate::schema::Schema;
use crate::tree::{self, Tree};

/// A runtime configuration engine.
///
/// Owns its loaders, history and event subscribers. Every accessor returns
/// owned copies, so callers can never alter recorded versions.
pub struct Ghii<S> {
	pub(super) schema: S,
	pub(super) loaders: LoaderRegistry,
	pub(super) history: History,
	pub(super) events: EventBus,
	pub(super) policy: FailurePolicy,
	pub(super) breaking: Vec<(String, BreakingPredicate)>,
}

impl<S> Ghii<S>
where
	S: Schema,
{
	/// Creates an engine with no loaders and the default policy.
	pub fn new(schema: S) -> Self {
		Self {
			schema,
			loaders: LoaderRegistry::new(),
			history: History::new(),
			events: EventBus::new(),
			policy: FailurePolicy::default(),
			breaking: Vec::new(),
		}
	}

	pub fn builder(schema: S) -> GhiiBuilder<S> {
		GhiiBuilder::new(schema)
	}

	/// Registers a loader after construction. It takes priority over every
	/// loader registered before it.
	pub fn register(&self, loader: impl Loader + 'static) -> &Self {
		self.loaders.register(Arc::new(loader));
		self
	}

	pub fn schema(&self) -> &S {
		&self.schema
	}

	pub fn policy(&self) -> FailurePolicy {
		self.policy
	}

	pub fn loader_count(&self) -> usize {
		self.loaders.len()
	}

	/// Returns the latest published snapshot, or the schema defaults when
	/// nothing was published yet. Defaults are not recorded.
	pub fn snapshot(&self) -> Tree {
		self.history
			.latest_value()
			.unwrap_or_else(|| self.schema.defaults())
	}

	/// Publishes `value` and returns the current snapshot.
	///
	/// A value structurally equal to the latest one is ignored: no version
	/// is recorded and no event fires. Otherwise a version is appended and
	/// subscribers are notified, in order, of `First` (first version only),
	/// `New` and any `Breaking` events.
	///
	/// # Notes
	///
	/// `publish` does not validate. Use [`take_snapshot`](Self::take_snapshot)
	/// to go through the schema. When called concurrently, history stays
	/// consistent but events of different publications may interleave.
	pub fn publish(&self, value: Tree) -> Tree {
		match self.history.append_if_changed(value) {
			Some(appended) => {
				let current = appended.current.value.clone();
				self.notify(appended);
				current
			}
			None => {
				#[cfg(feature = "logging")]
				log::debug!("Snapshot unchanged, nothing recorded");
				self.snapshot()
			}
		}
	}

	fn notify(&self, appended: Appended) {
		let Appended { previous, current } = appended;

		#[cfg(feature = "logging")]
		log::debug!("Recorded snapshot version {}", current.meta.version);

		let Some(previous) = previous else {
			#[cfg(feature = "logging")]
			log::info!("First configuration snapshot available");

			self.events.emit(&Lifecycle::First);
			self.events.emit(&Lifecycle::New(NewSnapshot {
				version: (*current).clone(),
				diff: Vec::new(),
			}));
			return;
		};

		self.events.emit(&Lifecycle::New(NewSnapshot {
			version: (*current).clone(),
			diff: tree::diff(&previous.value, &current.value),
		}));

		for (section, is_breaking) in &self.breaking {
			let old = tree::section(&previous.value, section);
			let new = tree::section(&current.value, section);
			if is_breaking(old, new) {
				#[cfg(feature = "logging")]
				log::warn!("Breaking change in section '{}' at version {}", section, current.meta.version);

				self.events.emit(&Lifecycle::Breaking(BreakingChange {
					section: section.clone(),
					old: old.clone(),
					new: new.clone(),
				}));
			}
		}
	}

	/// Returns a copy of every recorded version, oldest first.
	pub fn history(&self) -> Vec<SnapshotVersion> {
		self.history.versions()
	}

	/// Returns a copy of the latest version, or `None` before the first one.
	pub fn latest_version(&self) -> Option<SnapshotVersion> {
		self.history.latest()
	}

	/// Subscribes to the first-snapshot signal.
	pub fn on_first<F>(&self, f: F) -> SubscriptionId
	where
		F: Fn() + Send + Sync + 'static,
	{
		self.events.on_first(f)
	}

	/// Subscribes to new-snapshot events.
	pub fn on_new<F>(&self, f: F) -> SubscriptionId
	where
		F: Fn(&NewSnapshot) + Send + Sync + 'static,
	{
		self.events.on_new(f)
	}

	/// Subscribes to breaking-change events.
	pub fn on_breaking<F>(&self, f: F) -> SubscriptionId
	where
		F: Fn(&BreakingChange) + Send + Sync + 'static,
	{
		self.events.on_breaking(f)
	}

	/// One-shot variant of [`on_first`](Self::on_first).
	pub fn once_first<F>(&self, f: F) -> SubscriptionId
	where
		F: Fn() + Send + Sync + 'static,
	{
		self.events.once_first(f)
	}

	/// Subscribes to the next new-snapshot event only.
	pub fn once_new<F>(&self, f: F) -> SubscriptionId
	where
		F: Fn(&NewSnapshot) + Send + Sync + 'static,
	{
		self.events.once_new(f)
	}

	/// Subscribes to the next breaking-change event only.
	pub fn once_breaking<F>(&self, f: F) -> SubscriptionId
	where
		F: Fn(&BreakingChange) + Send + Sync + 'static,
	{
		self.events.once_breaking(f)
	}

	pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
		self.events.unsubscribe(id)
	}

	/// Returns the event bus, e.g. to inspect subscriber counts.
	pub fn events(&self) -> &EventBus {
		&self.events
	}

	/// Subscribes to every lifecycle event through an async channel.
	#[cfg(feature = "events")]
	pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Lifecycle> {
		self.events.subscribe()
	}
}

impl<S> std::fmt::Debug for Ghii<S>
where
	S: std::fmt::Debug,
{
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let sections: Vec<&str> = self.breaking.iter().map(|(s, _)| s.as_str()).collect();
		f.debug_struct("Ghii")
			.field("schema", &self.schema)
			.field("loaders", &self.loaders)
			.field("history", &self.history)
			.field("events", &self.events)
			.field("policy", &self.policy)
			.field("breaking", &sections)
			.finish()
	}
}
