/* src/loader/mod.rs */

//!
//! Asynchronous configuration loaders.
//!
//! A [`Loader`] produces a partial [`Tree`] or fails. Loaders are kept in a
//! [`LoaderRegistry`] whose order decides merge priority. Byte-oriented
//! loaders are composed from a [`Source`] and a [`Format`].

pub mod error;
pub mod format;
pub mod impls;
pub mod registry;
pub mod source;

pub use error::{LoadError, LoaderFailure};
pub use impls::{DynLoader, DynLoaderBuilder, FileLoader, FnLoader, SourceLoader, StaticLoader, loader_fn};
pub use registry::LoaderRegistry;
pub use source::{FileSource, MemorySource};

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::tree::Tree;

/// Zero-argument asynchronous producer of a partial configuration tree.
#[async_trait]
pub trait Loader: Send + Sync {
	/// Loads this loader's contribution.
	async fn load(&self) -> Result<Tree, LoadError>;

	/// Human readable name used to attribute failures.
	fn name(&self) -> Option<&str> {
		None
	}
}

/// Abstract format parser that converts bytes into a structured object.
pub trait Format: Send + Sync {
	/// List of supported extensions or identifiers.
	fn extensions(&self) -> &'static [&'static str];

	/// Parse the raw bytes into the target type.
	fn parse<T: DeserializeOwned>(&self, input: &[u8]) -> Result<T, LoadError>;
}

/// Abstract data source that retrieves raw bytes by key.
#[async_trait]
pub trait Source: Send + Sync {
	/// Read raw data as a vector of bytes.
	async fn read(&self, key: &str) -> Result<Vec<u8>, LoadError>;

	/// Check if the resource exists at the given key.
	async fn exists(&self, key: &str) -> bool;
}
