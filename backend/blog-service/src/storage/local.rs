use super::{ImageFolder, ImageStorage, ImageUpload};
use crate::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Images on local disk under `<public_dir>/<folder>/<name>`, served as
/// `/<folder>/<name>`.
#[derive(Debug, Clone)]
pub struct LocalImageStorage {
    public_dir: PathBuf,
}

impl LocalImageStorage {
    pub fn new(public_dir: impl Into<PathBuf>) -> Self {
        Self {
            public_dir: public_dir.into(),
        }
    }

    pub fn public_dir(&self) -> &Path {
        &self.public_dir
    }

    pub async fn ensure_folders(&self) -> std::io::Result<()> {
        for folder in [ImageFolder::Covers, ImageFolder::Avatars] {
            tokio::fs::create_dir_all(self.public_dir.join(folder.as_str())).await?;
        }
        Ok(())
    }

    /// Map a public URL back to a path inside `public_dir`.
    ///
    /// Only `/<known folder>/<single component>` is accepted.
    fn path_for_url(&self, url: &str) -> Option<PathBuf> {
        let (folder, name) = url.trim_start_matches('/').split_once('/')?;
        let folder = ImageFolder::from_segment(folder)?;
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return None;
        }
        Some(self.public_dir.join(folder.as_str()).join(name))
    }
}

#[async_trait]
impl ImageStorage for LocalImageStorage {
    async fn write(&self, folder: ImageFolder, name: &str, upload: &ImageUpload) -> Result<String> {
        let dir = self.public_dir.join(folder.as_str());
        tokio::fs::create_dir_all(&dir).await?;
        tokio::fs::write(dir.join(name), &upload.bytes).await?;
        Ok(format!("/{}/{}", folder.as_str(), name))
    }

    async fn delete(&self, url: &str) -> Result<()> {
        let Some(path) = self.path_for_url(url) else {
            tracing::warn!(url = %url, "refusing to delete image outside storage folders");
            return Ok(());
        };

        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(path = %path.display(), "image deleted");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "image already missing");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}
