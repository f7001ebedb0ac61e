/* src/loader/format/mod.rs */

use std::path::Path;

use super::{Format, LoadError};
use serde::de::DeserializeOwned;

mod json;
pub use json::Json;

#[cfg(feature = "toml")]
mod toml;
#[cfg(feature = "toml")]
pub use self::toml::Toml;

#[cfg(feature = "yaml")]
mod yaml;
#[cfg(feature = "yaml")]
pub use yaml::Yaml;

/// An enum wrapper for all supported formats, enabling dynamic dispatch-like behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnyFormat {
	Json,
	#[cfg(feature = "toml")]
	Toml,
	#[cfg(feature = "yaml")]
	Yaml,
}

impl AnyFormat {
	/// Every format enabled in this build, in probing order.
	pub fn all() -> Vec<AnyFormat> {
		vec![
			Self::Json,
			#[cfg(feature = "toml")]
			Self::Toml,
			#[cfg(feature = "yaml")]
			Self::Yaml,
		]
	}

	/// Finds the format handling `ext` (without the leading dot).
	pub fn for_extension(ext: &str) -> Option<AnyFormat> {
		Self::all()
			.into_iter()
			.find(|format| format.extensions().contains(&ext))
	}

	/// Finds the format handling the extension of `path`.
	pub fn for_path(path: &Path) -> Option<AnyFormat> {
		let ext = path.extension()?.to_str()?;
		Self::for_extension(ext)
	}
}

impl Format for AnyFormat {
	fn extensions(&self) -> &'static [&'static str] {
		match self {
			Self::Json => Json.extensions(),
			#[cfg(feature = "toml")]
			Self::Toml => Toml.extensions(),
			#[cfg(feature = "yaml")]
			Self::Yaml => Yaml.extensions(),
		}
	}

	fn parse<T: DeserializeOwned>(&self, input: &[u8]) -> Result<T, LoadError> {
		match self {
			Self::Json => Json.parse(input),
			#[cfg(feature = "toml")]
			Self::Toml => Toml.parse(input),
			#[cfg(feature = "yaml")]
			Self::Yaml => Yaml.parse(input),
		}
	}
}
