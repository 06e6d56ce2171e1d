//! Resume storage — issues short-lived presigned PUT URLs against the S3-compatible
//! storage API so browsers upload directly without proxying bytes through us.

pub mod handlers;

use std::time::Duration;

use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::presigning::PresigningConfig;
use thiserror::Error;

use crate::config::StorageConfig;

#[derive(Debug, Error)]
pub enum PresignError {
    #[error("invalid presigning config: {0}")]
    Config(String),

    #[error("{0}")]
    Sdk(String),
}

/// Signs direct-upload URLs. `AppState` carries one only when storage credentials exist.
#[async_trait]
pub trait UploadSigner: Send + Sync {
    async fn presign_put(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> Result<String, PresignError>;
}

pub struct S3UploadSigner {
    client: aws_sdk_s3::Client,
}

impl S3UploadSigner {
    /// Builds a path-style S3 client for the storage endpoint.
    pub async fn from_config(storage: &StorageConfig) -> Self {
        let credentials = Credentials::new(
            &storage.access_key_id,
            &storage.secret_access_key,
            None,
            None,
            "jobsearch-static",
        );

        let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(storage.region.clone()))
            .credentials_provider(credentials)
            .endpoint_url(&storage.endpoint)
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
            .force_path_style(true)
            .build();

        Self {
            client: aws_sdk_s3::Client::from_conf(s3_config),
        }
    }
}

#[async_trait]
impl UploadSigner for S3UploadSigner {
    async fn presign_put(
        &self,
        bucket: &str,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> Result<String, PresignError> {
        let presigning =
            PresigningConfig::expires_in(expires_in).map_err(|e| PresignError::Config(e.to_string()))?;

        let request = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .presigned(presigning)
            .await
            .map_err(|e| PresignError::Sdk(e.to_string()))?;

        Ok(request.uri().to_string())
    }
}
