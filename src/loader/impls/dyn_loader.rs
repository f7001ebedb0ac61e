/* src/loader/impls/dyn_loader.rs */

use async_trait::async_trait;

use super::super::{Format, LoadError, Loader, Source, format::AnyFormat};
use crate::tree::Tree;

/// Loads `<base_name>.<ext>` from a source, probing registered formats in order.
pub struct DynLoader {
	source: Box<dyn Source>,
	formats: Vec<AnyFormat>,
	base_name: String,
}

pub struct DynLoaderBuilder {
	source: Option<Box<dyn Source>>,
	formats: Vec<AnyFormat>,
	base_name: Option<String>,
}

impl DynLoaderBuilder {
	pub fn new() -> Self {
		Self {
			source: None,
			formats: Vec::new(),
			base_name: None,
		}
	}

	pub fn source(mut self, source: impl Source + 'static) -> Self {
		self.source = Some(Box::new(source));
		self
	}

	pub fn format(mut self, format: AnyFormat) -> Self {
		self.formats.push(format);
		self
	}

	pub fn base_name(mut self, base_name: impl Into<String>) -> Self {
		self.base_name = Some(base_name.into());
		self
	}

	pub fn build(self) -> Result<DynLoader, &'static str> {
		let source = self.source.ok_or("source is required")?;
		let base_name = self.base_name.ok_or("base name is required")?;
		if self.formats.is_empty() {
			return Err("at least one format is required");
		}
		Ok(DynLoader {
			source,
			formats: self.formats,
			base_name,
		})
	}
}

impl Default for DynLoaderBuilder {
	fn default() -> Self {
		Self::new()
	}
}

impl DynLoader {
	pub fn new(source: Box<dyn Source>, formats: Vec<AnyFormat>, base_name: impl Into<String>) -> Self {
		Self {
			source,
			formats,
			base_name: base_name.into(),
		}
	}

	pub fn builder() -> DynLoaderBuilder {
		DynLoaderBuilder::new()
	}

	/// Finds the first `<base_name>.<ext>` present in the source.
	async fn locate(&self) -> Option<(String, AnyFormat)> {
		let mut found: Option<(String, AnyFormat)> = None;

		for format in &self.formats {
			for ext in format.extensions() {
				let key = format!("{}.{}", self.base_name, ext);
				if !self.source.exists(&key).await {
					continue;
				}
				if found.is_none() {
					found = Some((key, *format));
					#[cfg(not(feature = "logging"))]
					return found;
				} else {
					#[cfg(feature = "logging")]
					if let Some((first_key, _)) = &found {
						log::warn!(
							"Conflict detected: multiple configuration files found for '{}'. Using '{}', ignoring '{}'.",
							self.base_name,
							first_key,
							key
						);
					}
				}
			}
		}

		found
	}
}

#[async_trait]
impl Loader for DynLoader {
	async fn load(&self) -> Result<Tree, LoadError> {
		let (key, format) = self
			.locate()
			.await
			.ok_or_else(|| LoadError::NotFound(self.base_name.clone()))?;
		let bytes = self.source.read(&key).await?;
		format.parse::<Tree>(&bytes)
	}

	fn name(&self) -> Option<&str> {
		Some(&self.base_name)
	}
}
