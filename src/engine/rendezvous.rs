/* src/engine/rendezvous.rs */

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use tokio::sync::Notify;

use super::{ActivationTarget, EngineError, Ghii};
use crate::events::SubscriptionGuard;
use crate::schema::Schema;
use crate::tree::Tree;

/// Default deadline of [`Ghii::wait_for_first_snapshot`].
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(30);

type TimeoutCallback = Box<dyn FnOnce() + Send>;
type SnapshotCallback = Box<dyn FnOnce(Tree) -> BoxFuture<'static, ()> + Send>;

/// Options for [`Ghii::wait_for_first_snapshot`].
pub struct WaitOptions {
	timeout: Option<Duration>,
	on_timeout: Option<TimeoutCallback>,
	on_first_snapshot: Option<SnapshotCallback>,
	activation: Option<Box<dyn ActivationTarget>>,
}

impl WaitOptions {
	pub fn new() -> Self {
		Self {
			timeout: Some(DEFAULT_WAIT_TIMEOUT),
			on_timeout: None,
			on_first_snapshot: None,
			activation: None,
		}
	}

	/// Bounds the loading phase. `Duration::ZERO` disables the deadline.
	pub fn timeout(mut self, timeout: Duration) -> Self {
		self.timeout = (!timeout.is_zero()).then_some(timeout);
		self
	}

	/// Waits without a deadline.
	pub fn no_timeout(mut self) -> Self {
		self.timeout = None;
		self
	}

	/// Called once if the deadline elapses.
	pub fn on_timeout<F>(mut self, f: F) -> Self
	where
		F: FnOnce() + Send + 'static,
	{
		self.on_timeout = Some(Box::new(f));
		self
	}

	/// Awaited with the snapshot before the wait resolves. Takes precedence
	/// over [`activate`](Self::activate).
	pub fn on_first_snapshot<F, Fut>(mut self, f: F) -> Self
	where
		F: FnOnce(Tree) -> Fut + Send + 'static,
		Fut: Future<Output = ()> + Send + 'static,
	{
		self.on_first_snapshot = Some(Box::new(move |tree| Box::pin(f(tree))));
		self
	}

	/// Activated once a snapshot exists; its failure fails the wait.
	pub fn activate(mut self, target: impl ActivationTarget + 'static) -> Self {
		self.activation = Some(Box::new(target));
		self
	}
}

impl Default for WaitOptions {
	fn default() -> Self {
		Self::new()
	}
}

impl std::fmt::Debug for WaitOptions {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("WaitOptions")
			.field("timeout", &self.timeout)
			.field("on_timeout", &self.on_timeout.is_some())
			.field("on_first_snapshot", &self.on_first_snapshot.is_some())
			.field("activation", &self.activation.is_some())
			.finish()
	}
}

impl<S> Ghii<S>
where
	S: Schema,
{
	/// Waits until a snapshot exists, taking one if needed.
	///
	/// With a published snapshot the loaders are not run again. Otherwise
	/// [`take_snapshot`](Self::take_snapshot) runs until it finishes, another
	/// publisher records the first snapshot, or the deadline elapses. A
	/// timed out wait drops its in-flight load, so it can never resolve
	/// later.
	///
	/// Once the snapshot is ready, the `on_first_snapshot` callback is
	/// awaited, or else the activation target is activated.
	pub async fn wait_for_first_snapshot(&self, options: WaitOptions) -> Result<Tree, EngineError> {
		let WaitOptions {
			timeout,
			on_timeout,
			on_first_snapshot,
			activation,
		} = options;

		let snapshot = match self.history.latest_value() {
			Some(snapshot) => snapshot,
			None => self.load_first(timeout, on_timeout).await?,
		};

		if let Some(callback) = on_first_snapshot {
			callback(snapshot.clone()).await;
		} else if let Some(target) = activation {
			target.activate().await.map_err(EngineError::Activation)?;
		}

		Ok(snapshot)
	}

	async fn load_first(
		&self,
		timeout: Option<Duration>,
		on_timeout: Option<TimeoutCallback>,
	) -> Result<Tree, EngineError> {
		let ready = Arc::new(Notify::new());
		let signal = Arc::clone(&ready);
		// Dropped on every exit path, removing the subscription.
		let _subscription = SubscriptionGuard::new(
			&self.events,
			self.events.on_first(move || signal.notify_one()),
		);

		// Published by someone else before we subscribed.
		if let Some(snapshot) = self.history.latest_value() {
			return Ok(snapshot);
		}

		let loading = async {
			tokio::select! {
				biased;
				result = self.take_snapshot() => result,
				_ = ready.notified() => Ok(self.snapshot()),
			}
		};

		let Some(limit) = timeout else {
			return loading.await;
		};

		match tokio::time::timeout(limit, loading).await {
			Ok(result) => result,
			Err(_) => {
				#[cfg(feature = "logging")]
				log::warn!("No configuration snapshot after {:?}", limit);

				if let Some(on_timeout) = on_timeout {
					on_timeout();
				}
				Err(EngineError::Timeout(limit))
			}
		}
	}
}
