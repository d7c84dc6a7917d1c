//! Image Hosting
//!
//! Profile pictures are uploaded to Cloudinary with an unsigned upload
//! preset; only the returned `secure_url` is stored.

use serde::Deserialize;
use thiserror::Error;

use crate::crypto::to_base64;

#[derive(Debug, Error)]
pub enum ImageHostError {
    #[error("Image upload request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Image host rejected the upload: {0}")]
    Rejected(String),

    #[error("Image host response did not contain a URL")]
    MissingUrl,
}

#[trait_variant::make(ImageHost: Send)]
pub trait LocalImageHost {
    /// Upload an image given as a data URI, remote URL or base64 payload.
    /// Returns the public HTTPS URL.
    async fn upload(&self, file: &str) -> Result<String, ImageHostError>;
}

/// Build a `data:` URI from raw bytes (multipart uploads)
pub fn to_data_uri(content_type: Option<&str>, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        content_type.unwrap_or("application/octet-stream"),
        to_base64(bytes)
    )
}

#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub api_base: String,
    pub cloud_name: String,
    pub upload_preset: String,
}

impl Default for CloudinaryConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.cloudinary.com/v1_1".to_string(),
            cloud_name: String::new(),
            upload_preset: "foodmed_unsigned".to_string(),
        }
    }
}

impl CloudinaryConfig {
    fn upload_url(&self) -> String {
        format!(
            "{}/{}/image/upload",
            self.api_base.trim_end_matches('/'),
            self.cloud_name
        )
    }
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    error: Option<UploadErrorBody>,
}

#[derive(Deserialize)]
struct UploadErrorBody {
    message: String,
}

#[derive(Clone)]
pub struct CloudinaryHost {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryHost {
    pub fn new(client: reqwest::Client, config: CloudinaryConfig) -> Self {
        Self { client, config }
    }
}

impl ImageHost for CloudinaryHost {
    async fn upload(&self, file: &str) -> Result<String, ImageHostError> {
        let form = [
            ("file", file),
            ("upload_preset", self.config.upload_preset.as_str()),
        ];

        let response: UploadResponse = self
            .client
            .post(self.config.upload_url())
            .form(&form)
            .send()
            .await?
            .json()
            .await?;

        if let Some(error) = response.error {
            return Err(ImageHostError::Rejected(error.message));
        }

        let url = response.secure_url.ok_or(ImageHostError::MissingUrl)?;
        tracing::debug!(url = %url, "Image uploaded");
        Ok(url)
    }
}
