/* src/history/version.rs */

use std::time::Instant;

use crate::tree::Tree;

/// Metadata associated with a snapshot version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Meta {
	/// Version number, starting at 1 and incremented on each append.
	pub version: u64,
	/// Instant the version was recorded.
	pub timestamp: Instant,
}

/// An immutable, recorded configuration snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotVersion {
	/// The published configuration tree.
	pub value: Tree,
	/// Metadata about this version.
	pub meta: Meta,
}
