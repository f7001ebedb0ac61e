/* src/tree/mod.rs */

//!
//! Configuration trees and the structural operations over them.
//!
//! A [`Tree`] maps top-level section names to arbitrary nested JSON values.
//! Every operation here borrows its inputs and allocates a fresh result, so
//! published snapshots are never aliased by later compositions.

mod diff;
mod merge;

pub use diff::{Change, ChangeKind, diff};
pub use merge::{merge, merge_all};

use serde_json::{Map, Value};

/// A configuration tree keyed by section name.
pub type Tree = Map<String, Value>;

/// Returns the value of `section` in `tree`, or `Value::Null` when absent.
pub fn section<'a>(tree: &'a Tree, section: &str) -> &'a Value {
	tree.get(section).unwrap_or(&Value::Null)
}
