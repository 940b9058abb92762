use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::{de::DeserializeOwned, Deserialize};
use sha2::{Digest, Sha256};

use crate::{
    entities::image::{ImageUpload, ALLOWED_IMAGE_FORMATS},
    errors::MediaError,
    media::{public_id_from_url, MediaStore},
    settings::MediaConfig,
};

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Cloudinary-backed media store using signed upload and destroy calls.
#[derive(Debug, Clone)]
pub struct CloudinaryStore {
    client: reqwest::Client,
    config: MediaConfig,
}

impl CloudinaryStore {
    pub fn new(config: MediaConfig) -> Result<Self, MediaError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MediaError::Client(e.to_string()))?;

        Ok(CloudinaryStore { client, config })
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/{}/image/{}", self.config.api_base, self.config.cloud_name, action)
    }

    /// Adds credentials and the request signature to the signed parameters.
    fn signed_fields(&self, params: Vec<(&'static str, String)>) -> Vec<(&'static str, String)> {
        let signature = sign_params(&params, &self.config.api_secret);

        let mut fields = params;
        fields.push(("api_key", self.config.api_key.clone()));
        fields.push(("signature_algorithm", "sha256".to_string()));
        fields.push(("signature", signature));
        fields
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, MediaError> {
        let status = response.status();

        if !status.is_success() {
            let message = match response.json::<ErrorResponse>().await {
                Ok(body) => body.error.message,
                Err(_) => status.canonical_reason().unwrap_or("unknown error").to_string(),
            };
            return Err(MediaError::Rejected { status: status.as_u16(), message });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| MediaError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl MediaStore for CloudinaryStore {
    async fn upload(&self, image: ImageUpload) -> Result<String, MediaError> {
        if !image.is_allowed_format() {
            let detected = image.detect_format().unwrap_or("unknown");
            return Err(MediaError::UnsupportedFormat(detected.to_string()));
        }

        let size = image.size();
        let file_name = image.upload_name();
        let mime = image.detect_mime().unwrap_or("application/octet-stream");

        tracing::debug!(
            %file_name,
            size,
            declared_type = image.content_type.as_deref().unwrap_or("none"),
            "Uploading image to media store"
        );

        let file_part = Part::bytes(image.data)
            .file_name(file_name)
            .mime_str(mime)?;

        let params = vec![
            ("allowed_formats", ALLOWED_IMAGE_FORMATS.join(",")),
            ("folder", self.config.folder.clone()),
            ("timestamp", Utc::now().timestamp().to_string()),
        ];

        let form = self
            .signed_fields(params)
            .into_iter()
            .fold(Form::new(), |form, (key, value)| form.text(key, value))
            .part("file", file_part);

        let response = self.client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await?;

        let body: UploadResponse = Self::read_json(response).await?;

        tracing::info!(url = %body.secure_url, size, "Image uploaded to media store");
        Ok(body.secure_url)
    }

    async fn destroy(&self, url: &str) -> Result<(), MediaError> {
        let public_id = public_id_from_url(url, &self.config.folder)
            .ok_or_else(|| MediaError::InvalidUrl(url.to_string()))?;

        let params = vec![
            ("public_id", public_id),
            ("timestamp", Utc::now().timestamp().to_string()),
        ];

        let response = self.client
            .post(self.endpoint("destroy"))
            .form(&self.signed_fields(params))
            .send()
            .await?;

        let body: DestroyResponse = Self::read_json(response).await?;

        match body.result.as_str() {
            "ok" => Ok(()),
            other => Err(MediaError::Rejected { status: 200, message: other.to_string() }),
        }
    }
}

/// Request signature: parameters sorted by name, joined as `k=v` with `&`,
/// followed by the API secret, hashed with SHA-256 and hex encoded.
/// Empty values are not signed.
pub fn sign_params(params: &[(&str, String)], api_secret: &str) -> String {
    let mut signed: Vec<&(&str, String)> = params
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .collect();
    signed.sort_by(|a, b| a.0.cmp(b.0));

    let to_sign = signed
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(to_sign.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}
