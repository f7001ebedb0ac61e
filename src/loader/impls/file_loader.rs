/* src/loader/impls/file_loader.rs */

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use super::super::{Format, LoadError, Loader, format::AnyFormat};
use crate::tree::Tree;

/// Loads a single configuration file, picking the format from its extension.
///
/// The path must exist when the loader is created. Each load re-checks it:
/// a directory yields [`LoadError::NotAFile`], a file removed since creation
/// yields [`LoadError::NotFound`].
#[derive(Debug, Clone)]
pub struct FileLoader {
	path: PathBuf,
	format: AnyFormat,
	name: String,
}

impl FileLoader {
	/// Opens `path`, detecting the format from its extension.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, LoadError> {
		let path = path.into();
		let format = AnyFormat::for_path(&path)
			.ok_or_else(|| LoadError::UnsupportedFormat(path.display().to_string()))?;
		Self::with_format(path, format)
	}

	/// Opens `path` with an explicit format.
	pub fn with_format(path: impl Into<PathBuf>, format: AnyFormat) -> Result<Self, LoadError> {
		let path = path.into();
		if !path.exists() {
			return Err(LoadError::NotFound(path.display().to_string()));
		}
		let name = path.display().to_string();
		Ok(Self { path, format, name })
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}

#[async_trait]
impl Loader for FileLoader {
	async fn load(&self) -> Result<Tree, LoadError> {
		let meta = match fs::metadata(&self.path).await {
			Ok(meta) => meta,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(LoadError::NotFound(self.name.clone())),
			Err(e) => return Err(LoadError::Io(e)),
		};
		if !meta.is_file() {
			return Err(LoadError::NotAFile(self.path.clone()));
		}

		let bytes = match fs::read(&self.path).await {
			Ok(bytes) => bytes,
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(LoadError::NotFound(self.name.clone())),
			Err(e) => return Err(LoadError::Io(e)),
		};
		self.format.parse::<Tree>(&bytes)
	}

	fn name(&self) -> Option<&str> {
		Some(&self.name)
	}
}
