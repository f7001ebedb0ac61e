/* src/history/store.rs */

use std::cell::RefCell;
use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwap;

use super::{Meta, SnapshotVersion};
use crate::tree::Tree;

/// Outcome of a successful [`History::append_if_changed`].
#[derive(Debug, Clone)]
pub struct Appended {
	/// The version that was latest before the append.
	pub previous: Option<Arc<SnapshotVersion>>,
	/// The version just recorded.
	pub current: Arc<SnapshotVersion>,
}

/// Append-only, ordered record of snapshot versions.
///
/// Uses RCU (Read-Copy-Update) so readers never block and always observe
/// either the list before an append or the list after it.
pub struct History {
	inner: ArcSwap<Vec<Arc<SnapshotVersion>>>,
}

impl History {
	/// Creates an empty history.
	pub fn new() -> Self {
		Self {
			inner: ArcSwap::from_pointee(Vec::new()),
		}
	}

	/// Appends `value` unless it equals the latest recorded value.
	///
	/// The comparison and the append happen in one atomic step, so two
	/// concurrent appends of the same value record it once.
	pub fn append_if_changed(&self, value: Tree) -> Option<Appended> {
		// Capture the outcome inside rcu; the closure may run more than once.
		let outcome: RefCell<Option<Appended>> = RefCell::new(None);

		self.inner.rcu(|current| {
			let previous = current.last().cloned();
			if let Some(latest) = &previous
				&& latest.value == value
			{
				*outcome.borrow_mut() = None;
				return Arc::clone(current);
			}

			let version = Arc::new(SnapshotVersion {
				value: value.clone(),
				meta: Meta {
					version: current.len() as u64 + 1,
					timestamp: Instant::now(),
				},
			});
			*outcome.borrow_mut() = Some(Appended {
				previous,
				current: Arc::clone(&version),
			});

			let mut next = Vec::with_capacity(current.len() + 1);
			next.extend(current.iter().cloned());
			next.push(version);
			Arc::new(next)
		});

		outcome.into_inner()
	}

	/// Returns an independent copy of every recorded version, oldest first.
	pub fn versions(&self) -> Vec<SnapshotVersion> {
		self.inner.load().iter().map(|version| (**version).clone()).collect()
	}

	/// Returns a copy of the most recent version, if any.
	pub fn latest(&self) -> Option<SnapshotVersion> {
		self.inner.load().last().map(|version| (**version).clone())
	}

	/// Returns the latest value without copying the version metadata.
	pub fn latest_value(&self) -> Option<Tree> {
		self.inner.load().last().map(|version| version.value.clone())
	}

	/// Returns the number of recorded versions.
	pub fn len(&self) -> usize {
		self.inner.load().len()
	}

	/// Returns true if nothing was recorded yet.
	pub fn is_empty(&self) -> bool {
		self.inner.load().is_empty()
	}
}

impl Default for History {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for History {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("History").field("len", &self.len()).finish()
	}
}
