//! Raw-payload archival to object storage.
//!
//! Write-only: objects are addressed by `(bucket, key)` and overwritten on
//! every run (last-write-wins, no versioning, no read-back).

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Serialize;

/// Write-only sink for archived payloads.
#[async_trait]
pub trait ObjectSink: Send + Sync {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<()>;
}

/// [`ObjectSink`] backed by S3, using the ambient AWS credentials.
pub struct S3Sink {
    client: aws_sdk_s3::Client,
}

impl S3Sink {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_s3::Client::new(config),
        }
    }
}

#[async_trait]
impl ObjectSink for S3Sink {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body.into())
            .content_type(content_type)
            .send()
            .await
            .with_context(|| format!("S3 put_object failed for s3://{bucket}/{key}"))?;

        Ok(())
    }
}

/// Serializes `value` and stores it at `(bucket, key)` with
/// `application/json` content type.
pub async fn archive_json<S>(
    sink: &S,
    bucket: &str,
    key: &str,
    value: &impl Serialize,
) -> Result<()>
where
    S: ObjectSink + ?Sized,
{
    let body = serde_json::to_vec(value)?;
    sink.put_object(bucket, key, body, "application/json").await
}
