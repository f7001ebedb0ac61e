/* src/events/mod.rs */

//!
//! Lifecycle events emitted when snapshots are published.
//!
//! Delivery is synchronous and ordered: for one publication subscribers see
//! `First` (only for the very first version), then `New`, then any
//! `Breaking` events, each in subscription order.

mod bus;

pub use bus::{EventBus, SubscriptionId};
pub(crate) use bus::SubscriptionGuard;

use serde_json::Value;

use crate::history::SnapshotVersion;
use crate::tree::Change;

/// Event discriminant, also used to route subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
	First,
	New,
	Breaking,
}

impl EventKind {
	/// Stable signal name.
	pub fn name(self) -> &'static str {
		match self {
			EventKind::First => "ghii:version:first",
			EventKind::New => "ghii:version:new",
			EventKind::Breaking => "ghii:version:breaking",
		}
	}
}

/// Payload of [`Lifecycle::New`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewSnapshot {
	/// The version just recorded.
	pub version: SnapshotVersion,
	/// Edit list from the previous value. Empty for the first version.
	pub diff: Vec<Change>,
}

/// Payload of [`Lifecycle::Breaking`].
#[derive(Debug, Clone, PartialEq)]
pub struct BreakingChange {
	pub section: String,
	/// Section value before the change, `Value::Null` when absent.
	pub old: Value,
	/// Section value after the change, `Value::Null` when absent.
	pub new: Value,
}

/// Events emitted by the engine on publication.
#[derive(Debug, Clone, PartialEq)]
pub enum Lifecycle {
	/// The first snapshot ever was accepted.
	First,
	/// A new distinct snapshot was accepted.
	New(NewSnapshot),
	/// A section predicate flagged a transition as incompatible.
	Breaking(BreakingChange),
}

impl Lifecycle {
	pub fn kind(&self) -> EventKind {
		match self {
			Lifecycle::First => EventKind::First,
			Lifecycle::New(_) => EventKind::New,
			Lifecycle::Breaking(_) => EventKind::Breaking,
		}
	}
}
