/* src/loader/source/file.rs */

use super::super::{LoadError, Source};
use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// A file system source backed by tokio::fs, sandboxed to a root directory.
#[derive(Debug, Clone)]
pub struct FileSource {
	root: PathBuf,
}

impl FileSource {
	/// Create a new FileSource rooted at the given path.
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Resolves the path safely, ensuring it is within the root directory.
	async fn resolve_secure(&self, key: &str) -> Result<PathBuf, LoadError> {
		// Basic path traversal check
		if Path::new(key)
			.components()
			.any(|component| matches!(component, Component::ParentDir))
		{
			return Err(LoadError::SandboxViolation);
		}

		let path = self.root.join(key);

		// Resolve root to absolute path
		let canonical_root = fs::canonicalize(&self.root).await?;

		// Resolve target path
		match fs::canonicalize(&path).await {
			Ok(canonical_path) => {
				if canonical_path.starts_with(&canonical_root) {
					Ok(canonical_path)
				} else {
					Err(LoadError::SandboxViolation)
				}
			}
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(LoadError::NotFound(key.to_string())),
			Err(e) => Err(LoadError::Io(e)),
		}
	}
}

#[async_trait]
impl Source for FileSource {
	async fn read(&self, key: &str) -> Result<Vec<u8>, LoadError> {
		let path = self.resolve_secure(key).await?;
		if !fs::metadata(&path).await?.is_file() {
			return Err(LoadError::NotAFile(path));
		}
		match fs::read(&path).await {
			Ok(bytes) => Ok(bytes),
			// Removed between resolution and read.
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(LoadError::NotFound(key.to_string())),
			Err(e) => Err(LoadError::Io(e)),
		}
	}

	async fn exists(&self, key: &str) -> bool {
		self.resolve_secure(key).await.is_ok()
	}
}
