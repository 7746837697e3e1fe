/// S3-backed image storage
///
/// Objects are keyed `<folder>/<name>` and exposed as `<base_url>/<key>`.
/// Works with AWS and S3-compatible stores via `S3_ENDPOINT`.
use super::{ImageFolder, ImageStorage, ImageUpload};
use crate::config::StorageConfig;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use std::sync::Arc;

#[derive(Clone)]
pub struct S3ImageStorage {
    client: Arc<Client>,
    bucket: String,
    base_url: String,
}

impl S3ImageStorage {
    pub fn new(client: Client, bucket: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            client: Arc::new(client),
            bucket: bucket.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Build a client from the ambient AWS credentials chain
    pub async fn from_config(config: &StorageConfig) -> anyhow::Result<Self> {
        let bucket = config
            .s3_bucket
            .clone()
            .ok_or_else(|| anyhow::anyhow!("S3_BUCKET is required for the s3 storage backend"))?;

        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.s3_region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = &config.s3_endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }
        let client = Client::from_conf(builder.build());

        let base_url = config
            .s3_base_url
            .clone()
            .unwrap_or_else(|| default_base_url(&bucket, &config.s3_region));

        tracing::info!(bucket = %bucket, base_url = %base_url, "S3 image storage configured");
        Ok(Self::new(client, bucket, base_url))
    }

    fn key_for_url<'a>(&self, url: &'a str) -> Option<&'a str> {
        let key = url.strip_prefix(&self.base_url)?.strip_prefix('/')?;
        let (folder, name) = key.split_once('/')?;
        ImageFolder::from_segment(folder)?;
        if name.is_empty() || name.contains('/') {
            return None;
        }
        Some(key)
    }
}

fn default_base_url(bucket: &str, region: &str) -> String {
    format!("https://{}.s3.{}.amazonaws.com", bucket, region)
}

#[async_trait]
impl ImageStorage for S3ImageStorage {
    async fn write(&self, folder: ImageFolder, name: &str, upload: &ImageUpload) -> Result<String> {
        let key = format!("{}/{}", folder.as_str(), name);
        let content_type = upload
            .content_type
            .as_ref()
            .map(|m| m.essence_str().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(content_type)
            .body(ByteStream::from(upload.bytes.clone()))
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("put_object {}: {}", key, DisplayErrorContext(e))))?;

        Ok(format!("{}/{}", self.base_url, key))
    }

    async fn delete(&self, url: &str) -> Result<()> {
        let Some(key) = self.key_for_url(url) else {
            tracing::warn!(url = %url, "refusing to delete object outside the image bucket");
            return Ok(());
        };

        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                AppError::Storage(format!("delete_object {}: {}", key, DisplayErrorContext(e)))
            })?;

        tracing::info!(key = %key, "image deleted");
        Ok(())
    }
}
