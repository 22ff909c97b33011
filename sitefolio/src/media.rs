//! Media storage for photo and document uploads.
//!
//! Uploaded files are forwarded to an S3-compatible bucket and served back through
//! the configured public base URL. Object keys are namespaced by project so a
//! bucket listing stays navigable.

use aws_sdk_s3::primitives::ByteStream;
use uuid::Uuid;

use crate::{
    config::MediaConfig,
    errors::Error,
    types::ProjectId,
};

pub struct MediaStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl MediaStore {
    pub async fn new(config: &MediaConfig) -> Self {
        let sdk_config = aws_config::load_from_env().await;

        let client = match &config.endpoint {
            Some(endpoint) => {
                // S3-compatible stores (MinIO, R2) need path-style addressing
                let s3_config = aws_sdk_s3::config::Builder::from(&sdk_config)
                    .endpoint_url(endpoint)
                    .force_path_style(true)
                    .build();
                aws_sdk_s3::Client::from_conf(s3_config)
            }
            None => aws_sdk_s3::Client::new(&sdk_config),
        };

        Self {
            client,
            bucket: config.bucket.clone(),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Store an uploaded file and return its public URL.
    ///
    /// The original filename is kept in the key for readability but prefixed
    /// with a random UUID so repeated uploads of the same name never collide.
    pub async fn store(
        &self,
        project_id: ProjectId,
        filename: &str,
        content_type: &str,
        data: bytes::Bytes,
    ) -> Result<String, Error> {
        let key = format!("projects/{}/{}-{}", project_id, Uuid::new_v4(), sanitize_filename(filename));

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type(content_type)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, bucket = %self.bucket, key = %key, "S3 upload failed");
                Error::Internal {
                    operation: "upload file to media storage".to_string(),
                }
            })?;

        Ok(format!("{}/{}", self.public_base_url, key))
    }
}

/// Strip path separators and control characters from a client-supplied filename.
fn sanitize_filename(filename: &str) -> String {
    let cleaned: String = filename
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename_passthrough() {
        assert_eq!(sanitize_filename("site-photo_01.jpg"), "site-photo_01.jpg");
    }

    #[test]
    fn test_sanitize_filename_strips_paths() {
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_filename("week 12 report.pdf"), "week_12_report.pdf");
    }

    #[test]
    fn test_sanitize_filename_empty() {
        assert_eq!(sanitize_filename(""), "upload");
    }
}
