//! Directory-backed cache store.

// std
use std::path::{Path, PathBuf};
// crates.io
use base64::prelude::*;
use sha2::{Digest, Sha256};
use tokio::fs;
// self
use crate::_prelude::*;

/// Stores one payload per key as a file under a directory.
///
/// File names are derived from a SHA-256 of the key so arbitrary keys map to safe names. Writes
/// go through a temporary file and a rename, so concurrent writers resolve as last write wins.
#[derive(Clone, Debug)]
pub struct FileStore {
	root: PathBuf,
}
impl FileStore {
	/// Create a store rooted at `root`; the directory is created lazily on first write.
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self { root: root.into() }
	}

	/// Directory holding the cached payloads.
	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Path of the file backing `key`.
	pub fn entry_path(&self, key: &str) -> PathBuf {
		let digest = Sha256::digest(key.as_bytes());

		self.root.join(format!("{}.json", BASE64_URL_SAFE_NO_PAD.encode(digest)))
	}

	/// Read the payload stored under `key`.
	pub async fn read(&self, key: &str) -> Result<Option<Vec<u8>>> {
		match fs::read(self.entry_path(key)).await {
			Ok(bytes) => Ok(Some(bytes)),
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
			Err(err) => Err(err.into()),
		}
	}

	/// Replace the payload stored under `key`.
	pub async fn write(&self, key: &str, value: &[u8]) -> Result<()> {
		fs::create_dir_all(&self.root).await?;

		let target = self.entry_path(key);
		let staging = target.with_extension(format!("{}.tmp", std::process::id()));

		fs::write(&staging, value).await?;

		if let Err(err) = fs::rename(&staging, &target).await {
			let _ = fs::remove_file(&staging).await;

			return Err(err.into());
		}

		Ok(())
	}
}
