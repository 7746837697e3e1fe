/// Image storage for post covers and avatars
///
/// Uploads are validated (type and size), given a unique file name and
/// written to one of two folders. Backends only know how to write and delete
/// bytes; naming, validation and the sentinel rule live here.
use crate::config::{StorageBackend, StorageConfig};
use crate::error::{AppError, Result};
use crate::sanitize::sanitize_file_name;
use async_trait::async_trait;
use std::sync::Arc;

pub mod local;
pub mod s3;

pub use local::LocalImageStorage;
pub use s3::S3ImageStorage;

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// File name of the shared default image; never deleted
pub const SENTINEL_FILE_NAME: &str = "default.png";

const ALLOWED_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "gif"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFolder {
    /// Post cover images
    Covers,
    Avatars,
}

impl ImageFolder {
    pub fn as_str(self) -> &'static str {
        match self {
            ImageFolder::Covers => "uploads",
            ImageFolder::Avatars => "images",
        }
    }

    pub fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "uploads" => Some(ImageFolder::Covers),
            "images" => Some(ImageFolder::Avatars),
            _ => None,
        }
    }
}

/// An uploaded image, fully buffered.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Multipart field the file arrived in
    pub field: String,
    pub file_name: String,
    pub content_type: Option<mime::Mime>,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// Check extension, MIME type and size.
    pub fn validate(&self) -> Result<()> {
        if self.bytes.is_empty() {
            return Err(AppError::invalid_field(&self.field, "uploaded file is empty"));
        }
        if self.bytes.len() > MAX_IMAGE_BYTES {
            return Err(AppError::invalid_field(
                &self.field,
                "image must be 5 MB or smaller",
            ));
        }

        let extension_ok = self
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            .unwrap_or(false);

        let mime_ok = self
            .content_type
            .as_ref()
            .map(|m| is_allowed_mime(m))
            .unwrap_or(false);

        if extension_ok && mime_ok {
            Ok(())
        } else {
            Err(AppError::invalid_field(
                &self.field,
                "only jpeg, jpg, png and gif images are allowed",
            ))
        }
    }
}

fn is_allowed_mime(m: &mime::Mime) -> bool {
    m.type_() == mime::IMAGE
        && matches!(m.subtype().as_str(), "jpeg" | "jpg" | "png" | "gif")
}

/// `<unix-millis>-<sanitized original name>`
pub fn stored_file_name(original: &str) -> Result<String> {
    let name = sanitize_file_name(original)
        .ok_or_else(|| AppError::BadRequest("invalid file name".to_string()))?;
    Ok(format!("{}-{}", chrono::Utc::now().timestamp_millis(), name))
}

/// Whether `url` points at the shared default image
pub fn is_sentinel(url: &str) -> bool {
    url.rsplit('/').next() == Some(SENTINEL_FILE_NAME)
}

#[async_trait]
pub trait ImageStorage: Send + Sync {
    /// Write bytes under `folder/name` and return the public URL.
    async fn write(&self, folder: ImageFolder, name: &str, upload: &ImageUpload) -> Result<String>;

    /// Delete the object behind a URL previously returned by `write`.
    /// Missing objects are not an error.
    async fn delete(&self, url: &str) -> Result<()>;

    /// Validate, name and store an upload.
    async fn save(&self, folder: ImageFolder, upload: &ImageUpload) -> Result<String> {
        upload.validate()?;
        let name = stored_file_name(&upload.file_name)?;
        let url = self.write(folder, &name, upload).await?;
        tracing::info!(folder = folder.as_str(), url = %url, bytes = upload.bytes.len(), "image stored");
        Ok(url)
    }

    /// Delete an image unless it is the sentinel.
    async fn remove(&self, url: &str) -> Result<()> {
        if is_sentinel(url) {
            return Ok(());
        }
        self.delete(url).await
    }
}

/// Build the configured backend
pub async fn build_image_storage(config: &StorageConfig) -> anyhow::Result<Arc<dyn ImageStorage>> {
    match config.backend {
        StorageBackend::Local => {
            let storage = LocalImageStorage::new(config.public_dir.clone());
            storage.ensure_folders().await?;
            Ok(Arc::new(storage))
        }
        StorageBackend::S3 => Ok(Arc::new(S3ImageStorage::from_config(config).await?)),
    }
}
