/* src/tree/diff.rs */

use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::Tree;

/// Kind of a single structural edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
	Added,
	Removed,
	Modified,
}

/// One entry of the edit list between two trees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Change {
	/// Keys from the root down to the changed value.
	pub path: Vec<String>,
	pub kind: ChangeKind,
	/// Previous value; `None` for `Added`.
	pub old: Option<Value>,
	/// Current value; `None` for `Removed`.
	pub new: Option<Value>,
}

impl Change {
	/// Renders the path as `a.b.c`.
	pub fn dotted(&self) -> String {
		self.path.join(".")
	}
}

impl fmt::Display for Change {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.kind {
			ChangeKind::Added => write!(f, "+ {}", self.dotted()),
			ChangeKind::Removed => write!(f, "- {}", self.dotted()),
			ChangeKind::Modified => write!(f, "~ {}", self.dotted()),
		}
	}
}

/// Computes the structural edit list that turns `old` into `new`.
///
/// Objects are walked recursively with keys in sorted order. Arrays and
/// scalars are compared wholesale, matching the merge policy.
pub fn diff(old: &Tree, new: &Tree) -> Vec<Change> {
	let mut changes = Vec::new();
	let mut path = Vec::new();
	diff_maps(old, new, &mut path, &mut changes);
	changes
}

fn diff_maps(old: &Tree, new: &Tree, path: &mut Vec<String>, out: &mut Vec<Change>) {
	let keys: BTreeSet<&String> = old.keys().chain(new.keys()).collect();

	for key in keys {
		path.push(key.clone());
		match (old.get(key), new.get(key)) {
			(Some(Value::Object(a)), Some(Value::Object(b))) => diff_maps(a, b, path, out),
			(Some(a), Some(b)) if a != b => out.push(Change {
				path: path.clone(),
				kind: ChangeKind::Modified,
				old: Some(a.clone()),
				new: Some(b.clone()),
			}),
			(Some(a), None) => out.push(Change {
				path: path.clone(),
				kind: ChangeKind::Removed,
				old: Some(a.clone()),
				new: None,
			}),
			(None, Some(b)) => out.push(Change {
				path: path.clone(),
				kind: ChangeKind::Added,
				old: None,
				new: Some(b.clone()),
			}),
			_ => {}
		}
		path.pop();
	}
}
