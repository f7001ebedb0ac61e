/* src/engine/mod.rs */

//!
//! The snapshot engine.
//!
//! - [`Ghii`] - loads, merges, validates and publishes snapshots
//! - [`WaitOptions`] - rendezvous options for [`Ghii::wait_for_first_snapshot`]
//! - [`ActivationTarget`] - deferred work run once a snapshot exists

mod activation;
mod builder;
mod error;
mod ghii;
mod pipeline;
mod policy;
mod rendezvous;

pub use activation::{ActivationFn, ActivationTarget, activation_fn};
pub use builder::GhiiBuilder;
pub use error::EngineError;
pub use ghii::Ghii;
pub use policy::{BreakingPredicate, FailurePolicy};
pub use rendezvous::{DEFAULT_WAIT_TIMEOUT, WaitOptions};
