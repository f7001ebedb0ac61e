/* src/lib.rs */

//!
//! A runtime configuration engine producing validated, versioned snapshots.
//!
//! This crate integrates these components:
//!
//! - **tree**: Configuration trees with deep merge and structural diff.
//! - **schema**: The `Schema` contract plus declarative and typed schemas.
//! - **loader**: Async loaders and format-agnostic sources.
//! - **history**: Append-only, lock-free record of snapshot versions.
//! - **events**: Typed lifecycle events with synchronous delivery.
//! - **engine**: The `Ghii` engine tying the above together.
//!
//! ## Feature Flags
//!
//! - `full`: Enables all features.
//! - `yaml`, `toml`: Loader formats (JSON is always available).
//! - `validate`: Enables `TypedSchema` backed by `validator`.
//! - `regex`: Enables pattern constraints on schema fields.
//! - `logging`: Emits diagnostics through the `log` facade.
//! - `events`: Enables async event subscription through a broadcast channel.
//!
//! ## Basic Usage
//!
//! ```ignore
//! let ghii = Ghii::builder(
//!     SectionSchema::new().section("http", Field::object().field("port", Field::integer().with_default(json!(8080)))),
//! )
//! .loader(FileLoader::open("config/app.yaml")?)
//! .build()?;
//!
//! let snapshot = ghii.wait_for_first_snapshot(WaitOptions::default()).await?;
//! ```

pub mod engine;
pub mod events;
pub mod history;
pub mod loader;
pub mod schema;
pub mod tree;

pub use engine::{
	ActivationTarget, EngineError, FailurePolicy, Ghii, GhiiBuilder, WaitOptions, activation_fn,
};
pub use events::{BreakingChange, EventKind, Lifecycle, NewSnapshot, SubscriptionId};
pub use history::{Meta, SnapshotVersion};
pub use loader::{LoadError, Loader, loader_fn};
pub use schema::{Field, Kind, Schema, SectionSchema, Violation};
pub use tree::{Change, ChangeKind, Tree};

/// Boxed error used for caller-supplied failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
