use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::primitives::ByteStream;
use std::path::Path;
use tracing::info;

use super::MediaBucket;
use crate::errors::SauerError;

/// Media bucket backed by S3. Keys are relative to the bucket root, which is
/// what the CDN distribution serves.
pub struct S3MediaBucket {
    client: S3Client,
    bucket_name: String,
}

impl S3MediaBucket {
    #[must_use]
    pub fn new(shared: &SdkConfig, bucket_name: &str) -> Self {
        Self::from_client(S3Client::new(shared), bucket_name)
    }

    #[must_use]
    pub fn from_client(client: S3Client, bucket_name: &str) -> Self {
        Self {
            client,
            bucket_name: bucket_name.to_string(),
        }
    }

    async fn put(
        &self,
        key: &str,
        body: ByteStream,
        content_type: &str,
    ) -> Result<(), SauerError> {
        self.client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            .content_type(content_type)
            .body(body)
            .send()
            .await?;
        info!(bucket = %self.bucket_name, key, content_type, "Uploaded object");
        Ok(())
    }
}

#[async_trait]
impl MediaBucket for S3MediaBucket {
    async fn upload_file(
        &self,
        path: &Path,
        key: &str,
        content_type: &str,
    ) -> Result<u64, SauerError> {
        let size = tokio::fs::metadata(path).await?.len();
        let body = ByteStream::from_path(path).await.map_err(|e| {
            SauerError::IoError(format!("failed to read {}: {e}", path.display()))
        })?;
        self.put(key, body, content_type).await?;
        Ok(size)
    }

    async fn upload_bytes(
        &self,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), SauerError> {
        self.put(key, ByteStream::from(body), content_type).await
    }

    async fn delete_object(&self, key: &str) -> Result<(), SauerError> {
        self.client
            .delete_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await?;
        info!(bucket = %self.bucket_name, key, "Deleted object");
        Ok(())
    }
}
