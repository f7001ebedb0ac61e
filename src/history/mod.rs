/* src/history/mod.rs */

mod store;
mod version;

pub use store::{Appended, History};
pub use version::{Meta, SnapshotVersion};
