use std::path::{Path, PathBuf};

use crate::api::error;

/// Regular file found in the storage directory
#[derive(Debug, Clone)]
pub struct StoredEntry {
    pub filename: String,
    pub path: PathBuf,
}

/// Open handle on a stored file, ready to be streamed
#[derive(Debug)]
pub struct StoredFile {
    pub file: tokio::fs::File,
    pub len: u64,
}

#[async_trait::async_trait]
pub trait ImageStore {
    fn root(&self) -> &Path;

    /// Writes a new file. Fails with `SystemError::Conflict` when the name is already taken,
    /// existing files are never overwritten.
    async fn create(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, error::SystemError>;

    /// Regular files directly inside the storage directory, in enumeration order.
    async fn list(&self) -> Result<Vec<StoredEntry>, error::SystemError>;

    /// `relative_path` is `/`-separated and may point into subdirectories. `None` when it does
    /// not name a regular file below the root.
    async fn open(&self, relative_path: &str) -> Result<Option<StoredFile>, error::SystemError>;
}
