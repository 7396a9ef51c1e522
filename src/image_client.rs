//! HTTP client for the image-hosting endpoint.
//!
//! Uploads go as multipart/form-data (one part named `image`) to
//! `{base}/upload.php`; the endpoint answers `{success, imageUrl, error}`.
//! Downloads are plain GETs written to uniquely named files in the
//! configured downloads directory. The host is anonymous, so this client
//! knows nothing about sessions; `NoteStore` gates access to it.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::errors::StoreError;

/// Response shape of the upload endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    success: bool,
    image_url: Option<String>,
    error: Option<String>,
}

impl UploadResponse {
    /// Server-assigned URL on success, server-reported error otherwise.
    fn into_url(self) -> Result<String, String> {
        if self.success {
            if let Some(url) = self.image_url {
                return Ok(url);
            }
        }
        Err(self
            .error
            .unwrap_or_else(|| "Failed to upload image".to_string()))
    }
}

pub struct ImageClient {
    upload_url: String,
    downloads_dir: PathBuf,
    client: reqwest::Client,
}

impl ImageClient {
    pub fn new(base_url: &str, downloads_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_url: format!("{}/upload.php", base_url.trim_end_matches('/')),
            downloads_dir: downloads_dir.into(),
            client: crate::http::shared_client().clone(),
        }
    }

    /// Upload a local image file, returning the server-assigned URL.
    pub async fn upload(&self, path: &Path) -> Result<String, StoreError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| StoreError::Upload(format!("Failed to read {}: {}", path.display(), e)))?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "image.jpg".to_string());

        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str(mime_for_path(path))
            .map_err(|e| StoreError::Upload(format!("Invalid content type: {}", e)))?;
        let form = reqwest::multipart::Form::new().part("image", part);

        log::info!("[ImageApi] Uploading {} to {}", path.display(), self.upload_url);
        let resp = self
            .client
            .post(&self.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| StoreError::Upload(format!("Upload request failed: {}", e)))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(StoreError::Upload(format!("Upload HTTP {}: {}", status, body)));
        }

        let parsed = resp
            .json::<UploadResponse>()
            .await
            .map_err(|e| StoreError::Upload(format!("Invalid upload response: {}", e)))?;

        let url = parsed.into_url().map_err(StoreError::Upload)?;
        log::info!("[ImageApi] Uploaded as {}", url);
        Ok(url)
    }

    /// Fetch an image URL into a new uniquely named file in the downloads
    /// directory. Every call writes a fresh file; nothing is deduplicated.
    pub async fn download(&self, url: &str) -> Result<PathBuf, StoreError> {
        log::info!("[ImageApi] Downloading {}", url);

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| StoreError::Download(format!("Download request failed: {}", e)))?;

        if !resp.status().is_success() {
            return Err(StoreError::Download(format!("Download HTTP {}", resp.status())));
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| StoreError::Download(format!("Failed to read image body: {}", e)))?;

        tokio::fs::create_dir_all(&self.downloads_dir).await.map_err(|e| {
            StoreError::Download(format!(
                "Cannot create {}: {}",
                self.downloads_dir.display(),
                e
            ))
        })?;

        let file_name = format!("note_image_{}.{}", uuid::Uuid::new_v4(), image_extension(url));
        let dest = self.downloads_dir.join(file_name);
        tokio::fs::write(&dest, &bytes)
            .await
            .map_err(|e| StoreError::Download(format!("Failed to write {}: {}", dest.display(), e)))?;

        log::info!("[ImageApi] Saved {} bytes to {}", bytes.len(), dest.display());
        Ok(dest)
    }
}

/// Content type for the upload part, from the file extension.
fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => "application/octet-stream",
    }
}

/// Extension for a downloaded file, from the URL path when it is a known
/// image extension; `jpg` otherwise.
fn image_extension(url: &str) -> &'static str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let ext = path.rsplit('.').next().map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "png",
        Some("jpeg") => "jpeg",
        Some("jpg") => "jpg",
        Some("gif") => "gif",
        Some("webp") => "webp",
        _ => "jpg",
    }
}
