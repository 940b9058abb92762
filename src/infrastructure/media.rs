use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

use crate::{entities::image::ImageUpload, errors::MediaError};

pub mod cloudinary;

/// Remote object store holding project images.
///
/// Implementors provide the raw `upload`/`destroy` calls; callers go through
/// `store` and `remove`, which carry the absent-image and best-effort rules.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Uploads one image and returns its public URL.
    async fn upload(&self, image: ImageUpload) -> Result<String, MediaError>;

    /// Deletes the remote object a previously returned URL points at.
    async fn destroy(&self, url: &str) -> Result<(), MediaError>;

    /// Uploads `image` if there is one. No image means an empty URL and no
    /// remote call.
    async fn store(&self, image: Option<ImageUpload>) -> Result<String, MediaError> {
        match image {
            Some(image) => self.upload(image).await,
            None => Ok(String::new()),
        }
    }

    /// Best-effort delete: failures are logged and swallowed.
    async fn remove(&self, url: &str) {
        match self.destroy(url).await {
            Ok(()) => tracing::info!(%url, "Image deleted from media store"),
            Err(e) => tracing::warn!(%url, error = %e, "Could not delete image from media store"),
        }
    }
}

#[async_trait]
impl<T: MediaStore + ?Sized> MediaStore for Arc<T> {
    async fn upload(&self, image: ImageUpload) -> Result<String, MediaError> {
        (**self).upload(image).await
    }

    async fn destroy(&self, url: &str) -> Result<(), MediaError> {
        (**self).destroy(url).await
    }
}

/// Derives the store-side id of an uploaded object from its URL: the final
/// path segment without extension, under `folder`.
///
/// `https://res.cloudinary.com/demo/image/upload/v17/projects/abc123.png`
/// with folder `projects` gives `projects/abc123`.
pub fn public_id_from_url(url: &str, folder: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let last = parsed.path_segments()?.next_back()?;

    let name = last.split('.').next().unwrap_or_default();
    if name.is_empty() {
        return None;
    }

    let folder = folder.trim_matches('/');
    if folder.is_empty() {
        Some(name.to_string())
    } else {
        Some(format!("{}/{}", folder, name))
    }
}
