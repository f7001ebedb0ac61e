/* src/tree/merge.rs */

use serde_json::Value;

use super::Tree;

/// Deep-merges `overlay` on top of `base` into a newly allocated value.
///
/// Objects merge field by field. Any other overlay value, arrays included,
/// replaces the base value wholesale.
pub fn merge(base: &Value, overlay: &Value) -> Value {
	match (base, overlay) {
		(Value::Object(base), Value::Object(overlay)) => Value::Object(merge_maps(base, overlay)),
		(_, overlay) => overlay.clone(),
	}
}

/// Folds `layers` over `defaults` in order, the last layer winning conflicts.
pub fn merge_all<'a, I>(defaults: &Tree, layers: I) -> Tree
where
	I: IntoIterator<Item = &'a Tree>,
{
	layers
		.into_iter()
		.fold(defaults.clone(), |acc, layer| merge_maps(&acc, layer))
}

fn merge_maps(base: &Tree, overlay: &Tree) -> Tree {
	let mut result = base.clone();
	for (key, value) in overlay {
		let merged = match result.get(key) {
			Some(existing) => merge(existing, value),
			None => value.clone(),
		};
		result.insert(key.clone(), merged);
	}
	result
}
