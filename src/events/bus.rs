/* src/events/bus.rs */

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwap;

use super::{BreakingChange, EventKind, Lifecycle, NewSnapshot};

/// Default capacity of the async event channel.
#[cfg(feature = "events")]
pub const DEFAULT_EVENT_CAPACITY: usize = 100;

/// Handle returned by subscriptions, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId {
	kind: EventKind,
	id: u64,
}

impl SubscriptionId {
	pub fn kind(&self) -> EventKind {
		self.kind
	}
}

type Handler<E> = Arc<dyn Fn(&E) + Send + Sync>;

struct Entry<E> {
	id: u64,
	once: bool,
	handler: Handler<E>,
}

impl<E> Clone for Entry<E> {
	fn clone(&self) -> Self {
		Self {
			id: self.id,
			once: self.once,
			handler: Arc::clone(&self.handler),
		}
	}
}

/// Subscriber list for one event kind.
struct Listeners<E> {
	inner: ArcSwap<Vec<Entry<E>>>,
}

impl<E> Listeners<E> {
	fn new() -> Self {
		Self {
			inner: ArcSwap::from_pointee(Vec::new()),
		}
	}

	fn add(&self, id: u64, once: bool, handler: Handler<E>) {
		self.inner.rcu(|current| {
			let mut next = (**current).clone();
			next.push(Entry {
				id,
				once,
				handler: Arc::clone(&handler),
			});
			next
		});
	}

	fn remove(&self, id: u64) -> bool {
		let previous = self.inner.rcu(|current| {
			let mut next = (**current).clone();
			next.retain(|entry| entry.id != id);
			next
		});
		previous.iter().any(|entry| entry.id == id)
	}

	fn len(&self) -> usize {
		self.inner.load().len()
	}

	// Handlers run against a snapshot of the list, so they may subscribe
	// or unsubscribe without affecting the current dispatch.
	fn dispatch(&self, event: &E) {
		let entries = self.inner.load_full();
		for entry in entries.iter() {
			// Only the dispatch that removes a one-shot entry delivers to it.
			if entry.once && !self.remove(entry.id) {
				continue;
			}
			(entry.handler)(event);
		}
	}
}

/// Typed publish/subscribe hub with one subscriber table per event kind.
pub struct EventBus {
	next_id: AtomicU64,
	first: Listeners<()>,
	new: Listeners<NewSnapshot>,
	breaking: Listeners<BreakingChange>,
	#[cfg(feature = "events")]
	channel: tokio::sync::broadcast::Sender<Lifecycle>,
}

impl EventBus {
	pub fn new() -> Self {
		Self {
			next_id: AtomicU64::new(0),
			first: Listeners::new(),
			new: Listeners::new(),
			breaking: Listeners::new(),
			#[cfg(feature = "events")]
			channel: tokio::sync::broadcast::channel(DEFAULT_EVENT_CAPACITY).0,
		}
	}

	/// Creates a bus with a custom async channel capacity.
	///
	/// Note: Events may be dropped for async subscribers that fall behind
	/// by more than `capacity` events. Synchronous handlers never miss one.
	#[cfg(feature = "events")]
	pub fn with_capacity(capacity: usize) -> Self {
		Self {
			channel: tokio::sync::broadcast::channel(capacity).0,
			..Self::new()
		}
	}

	fn next(&self, kind: EventKind) -> SubscriptionId {
		SubscriptionId {
			kind,
			id: self.next_id.fetch_add(1, Ordering::Relaxed),
		}
	}

	/// Subscribes to the first-snapshot signal.
	pub fn on_first<F>(&self, f: F) -> SubscriptionId
	where
		F: Fn() + Send + Sync + 'static,
	{
		self.add_first(false, f)
	}

	/// Subscribes to new-snapshot events.
	pub fn on_new<F>(&self, f: F) -> SubscriptionId
	where
		F: Fn(&NewSnapshot) + Send + Sync + 'static,
	{
		self.add_new(false, f)
	}

	/// Subscribes to breaking-change events.
	pub fn on_breaking<F>(&self, f: F) -> SubscriptionId
	where
		F: Fn(&BreakingChange) + Send + Sync + 'static,
	{
		self.add_breaking(false, f)
	}

	/// Like [`on_first`](Self::on_first), removed after its first delivery.
	pub fn once_first<F>(&self, f: F) -> SubscriptionId
	where
		F: Fn() + Send + Sync + 'static,
	{
		self.add_first(true, f)
	}

	/// Like [`on_new`](Self::on_new), removed after its first delivery.
	pub fn once_new<F>(&self, f: F) -> SubscriptionId
	where
		F: Fn(&NewSnapshot) + Send + Sync + 'static,
	{
		self.add_new(true, f)
	}

	/// Like [`on_breaking`](Self::on_breaking), removed after its first delivery.
	pub fn once_breaking<F>(&self, f: F) -> SubscriptionId
	where
		F: Fn(&BreakingChange) + Send + Sync + 'static,
	{
		self.add_breaking(true, f)
	}

	fn add_first<F>(&self, once: bool, f: F) -> SubscriptionId
	where
		F: Fn() + Send + Sync + 'static,
	{
		let id = self.next(EventKind::First);
		self.first.add(id.id, once, Arc::new(move |_: &()| f()));
		id
	}

	fn add_new<F>(&self, once: bool, f: F) -> SubscriptionId
	where
		F: Fn(&NewSnapshot) + Send + Sync + 'static,
	{
		let id = self.next(EventKind::New);
		self.new.add(id.id, once, Arc::new(f));
		id
	}

	fn add_breaking<F>(&self, once: bool, f: F) -> SubscriptionId
	where
		F: Fn(&BreakingChange) + Send + Sync + 'static,
	{
		let id = self.next(EventKind::Breaking);
		self.breaking.add(id.id, once, Arc::new(f));
		id
	}

	/// Removes a subscription. Returns false if it was already removed.
	pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
		match id.kind {
			EventKind::First => self.first.remove(id.id),
			EventKind::New => self.new.remove(id.id),
			EventKind::Breaking => self.breaking.remove(id.id),
		}
	}

	/// Returns the number of synchronous subscribers for `kind`.
	pub fn subscriber_count(&self, kind: EventKind) -> usize {
		match kind {
			EventKind::First => self.first.len(),
			EventKind::New => self.new.len(),
			EventKind::Breaking => self.breaking.len(),
		}
	}

	/// Delivers `event` to every subscriber of its kind.
	pub fn emit(&self, event: &Lifecycle) {
		match event {
			Lifecycle::First => self.first.dispatch(&()),
			Lifecycle::New(payload) => self.new.dispatch(payload),
			Lifecycle::Breaking(payload) => self.breaking.dispatch(payload),
		}

		#[cfg(feature = "events")]
		{
			// No receivers is not an error.
			let _ = self.channel.send(event.clone());
		}
	}

	/// Subscribes to every event through an async channel.
	#[cfg(feature = "events")]
	pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Lifecycle> {
		self.channel.subscribe()
	}
}

impl Default for EventBus {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for EventBus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("EventBus")
			.field("first", &self.first.len())
			.field("new", &self.new.len())
			.field("breaking", &self.breaking.len())
			.finish_non_exhaustive()
	}
}

/// Removes a subscription when dropped.
pub(crate) struct SubscriptionGuard<'a> {
	bus: &'a EventBus,
	id: SubscriptionId,
}

impl<'a> SubscriptionGuard<'a> {
	pub(crate) fn new(bus: &'a EventBus, id: SubscriptionId) -> Self {
		Self { bus, id }
	}
}

impl Drop for SubscriptionGuard<'_> {
	fn drop(&mut self) {
		self.bus.unsubscribe(self.id);
	}
}
