/* src/engine/activation.rs */

use std::future::Future;

use async_trait::async_trait;

use crate::BoxError;

/// Work deferred until the first snapshot is available, such as starting
/// a module that reads configuration during initialization.
#[async_trait]
pub trait ActivationTarget: Send + Sync {
	async fn activate(&self) -> Result<(), BoxError>;
}

/// An activation target backed by an async closure.
pub struct ActivationFn<F> {
	f: F,
}

/// Wraps an async closure into an [`ActivationTarget`].
pub fn activation_fn<F, Fut>(f: F) -> ActivationFn<F>
where
	F: Fn() -> Fut + Send + Sync + 'static,
	Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
{
	ActivationFn { f }
}

#[async_trait]
impl<F, Fut> ActivationTarget for ActivationFn<F>
where
	F: Fn() -> Fut + Send + Sync + 'static,
	Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
{
	async fn activate(&self) -> Result<(), BoxError> {
		(self.f)().await
	}
}
