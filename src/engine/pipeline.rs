/* src/engine/pipeline.rs */

use super::{EngineError, FailurePolicy, Ghii};
use crate::schema::Schema;
use crate::tree::{Tree, merge_all};

impl<S> Ghii<S>
where
	S: Schema,
{
	/// Runs the full pipeline: load, merge, validate, publish.
	///
	/// All loaders run concurrently and are awaited to completion even when
	/// some fail. The merged tree is published only if the schema accepts
	/// it; on any error history and subscribers are left untouched.
	pub async fn take_snapshot(&self) -> Result<Tree, EngineError> {
		let defaults = self.schema.defaults();

		let mut layers = Vec::with_capacity(self.loaders.len());
		let mut failures = Vec::new();
		for result in self.loaders.run_all().await {
			match result {
				Ok(tree) => layers.push(tree),
				Err(failure) => failures.push(failure),
			}
		}

		if !failures.is_empty() {
			#[cfg(feature = "logging")]
			for failure in &failures {
				log::warn!("Config {}", failure);
			}

			if self.policy == FailurePolicy::Strict {
				return Err(EngineError::Loaders(failures));
			}
		}

		let merged = merge_all(&defaults, &layers);

		if let Err(violations) = self.schema.validate(&merged).await {
			#[cfg(feature = "logging")]
			log::warn!("Rejected configuration with {} violation(s)", violations.len());

			return Err(EngineError::Validation(violations));
		}

		self.publish(merged.clone());
		Ok(merged)
	}
}
