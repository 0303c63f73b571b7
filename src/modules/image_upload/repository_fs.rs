use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::{
    api::error,
    modules::image_upload::repository::{ImageStore, StoredEntry, StoredFile},
    utils::{is_plain_filename, safe_relative_path},
};

#[derive(Clone)]
pub struct LocalImageStore {
    root: PathBuf,
}

impl LocalImageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_of(&self, filename: &str) -> Option<PathBuf> {
        is_plain_filename(filename).then(|| self.root.join(filename))
    }
}

/// Writes `bytes` through `writer`. On failure the partially written file at `path` is removed.
async fn write_or_discard<W>(mut writer: W, path: &Path, bytes: &[u8]) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let written = async {
        writer.write_all(bytes).await?;
        writer.flush().await
    }
    .await;

    if let Err(e) = written {
        drop(writer);
        if let Err(cleanup) = tokio::fs::remove_file(path).await {
            log::warn!("Could not remove partial upload {}: {}", path.display(), cleanup);
        }
        return Err(e);
    }

    Ok(())
}

#[async_trait::async_trait]
impl ImageStore for LocalImageStore {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn create(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, error::SystemError> {
        let path = self
            .path_of(filename)
            .ok_or_else(|| error::SystemError::bad_request("Invalid file name"))?;

        let file = match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(error::SystemError::conflict(format!("{filename} already exists")));
            }
            Err(e) => return Err(e.into()),
        };

        write_or_discard(file, &path, bytes).await?;
        Ok(path)
    }

    async fn list(&self) -> Result<Vec<StoredEntry>, error::SystemError> {
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        let mut files = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let Ok(filename) = entry.file_name().into_string() else {
                log::debug!("Skipping non UTF-8 entry {:?}", entry.path());
                continue;
            };

            // follows symlinks, a link to an image counts as an image
            let is_file = match tokio::fs::metadata(entry.path()).await {
                Ok(meta) => meta.is_file(),
                Err(e) if e.kind() == ErrorKind::NotFound => false,
                Err(e) => return Err(e.into()),
            };
            if !is_file {
                continue;
            }

            files.push(StoredEntry { filename, path: entry.path() });
        }

        Ok(files)
    }

    async fn open(&self, relative_path: &str) -> Result<Option<StoredFile>, error::SystemError> {
        let Some(relative) = safe_relative_path(relative_path) else {
            return Ok(None);
        };
        let path = self.root.join(relative);

        let len = match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => meta.len(),
            Ok(_) => return Ok(None),
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match tokio::fs::File::open(&path).await {
            Ok(file) => Ok(Some(StoredFile { file, len })),
            // removed between the metadata check and the open
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
