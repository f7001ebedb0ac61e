/* src/engine/policy.rs */

use std::sync::Arc;

use serde_json::Value;

/// How [`take_snapshot`](super::Ghii::take_snapshot) treats loader failures.
///
/// Fixed per engine at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
	/// Any loader failure fails the snapshot, reporting every failure.
	#[default]
	Strict,
	/// Failed loaders are skipped; the rest merge over the defaults.
	Partial,
}

/// Decides whether a section transition `(old, new)` is breaking.
pub type BreakingPredicate = Arc<dyn Fn(&Value, &Value) -> bool + Send + Sync>;
