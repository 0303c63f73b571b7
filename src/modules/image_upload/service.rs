use std::sync::Arc;

use crate::api::error;
use crate::modules::image_upload::{
    model::{NewImage, UploadConfig},
    repository::{ImageStore, StoredFile},
    schema::{ImageDescriptor, UploadResponse},
};
use crate::utils::{generate_filename, has_image_extension, is_image_mime};

#[derive(Clone)]
pub struct ImageUploadService<S>
where
    S: ImageStore + Send + Sync,
{
    store: Arc<S>,
    config: UploadConfig,
}

impl<S> ImageUploadService<S>
where
    S: ImageStore + Send + Sync,
{
    pub fn new(store: Arc<S>, config: UploadConfig) -> Self {
        log::info!(
            "ImageUploadService initialized on {} (max file size {} bytes)",
            store.root().display(),
            config.max_file_size
        );
        Self { store, config }
    }

    pub fn config(&self) -> &UploadConfig {
        &self.config
    }

    /// Rejects anything that isn't declared as `image/*`
    pub fn validate_mime(&self, mime_type: &str) -> Result<(), error::SystemError> {
        if !is_image_mime(mime_type) {
            return Err(error::SystemError::bad_request("Only image files are allowed!"));
        }
        Ok(())
    }

    pub fn validate_size(&self, file_size: usize) -> Result<(), error::SystemError> {
        if file_size > self.config.max_file_size {
            return Err(error::SystemError::bad_request(self.config.max_size_message()));
        }
        Ok(())
    }

    /// Validate, name and persist an uploaded image
    pub async fn upload_image(
        &self,
        image: NewImage,
    ) -> Result<UploadResponse, error::SystemError> {
        self.validate_mime(&image.mime_type)?;
        self.validate_size(image.bytes.len())?;

        let filename = self.store_unique(&image).await?;

        log::info!(
            "Stored upload {} ({} bytes, {}) from '{}'",
            filename,
            image.bytes.len(),
            image.mime_type,
            image.original_filename
        );

        Ok(UploadResponse {
            url: self.config.url_for(&filename),
            filename,
            original_name: image.original_filename,
            size: image.bytes.len() as u64,
        })
    }

    async fn store_unique(&self, image: &NewImage) -> Result<String, error::SystemError> {
        let mut last_conflict = None;

        for _ in 0..self.config.max_name_attempts.max(1) {
            let filename = generate_filename(&self.config.field_name, &image.original_filename);
            match self.store.create(&filename, &image.bytes).await {
                Ok(_) => return Ok(filename),
                Err(error::SystemError::Conflict(msg)) => {
                    log::warn!("Generated name collided: {}", msg);
                    last_conflict = Some(msg);
                }
                Err(e) => return Err(e),
            }
        }

        Err(error::SystemError::Conflict(
            last_conflict.unwrap_or_else(|| "Could not allocate a unique file name".into()),
        ))
    }

    /// Re-scans the storage directory on every call
    pub async fn list_images(&self) -> Result<Vec<ImageDescriptor>, error::SystemError> {
        let entries = self.store.list().await?;

        Ok(entries
            .into_iter()
            .filter(|entry| has_image_extension(&entry.filename))
            .map(|entry| ImageDescriptor {
                url: self.config.url_for(&entry.filename),
                path: entry.path.to_string_lossy().into_owned(),
                filename: entry.filename,
            })
            .collect())
    }

    /// Stored file below the storage directory and its inferred content type
    pub async fn open(
        &self,
        relative_path: &str,
    ) -> Result<(StoredFile, String), error::SystemError> {
        let stored = self
            .store
            .open(relative_path)
            .await?
            .ok_or_else(|| error::SystemError::not_found("File not found"))?;

        let content_type =
            mime_guess::from_path(relative_path).first_or_octet_stream().to_string();
        Ok((stored, content_type))
    }
}
