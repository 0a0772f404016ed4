// ABOUTME: Recipe image decoding and media storage on the local filesystem
// ABOUTME: Accepts base64 data URIs, decodes the payload to verify it, and stores under MEDIA_ROOT
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Foodgram Contributors

use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use foodgram_core::{
    constants::{defaults::RECIPE_IMAGE_DIR, limits::MAX_IMAGE_BYTES},
    errors::{AppError, AppResult},
};
use image::ImageFormat;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::environment::MediaConfig;

/// Subtypes accepted in `data:image/<subtype>;base64,`
const ACCEPTED_SUBTYPES: [&str; 5] = ["png", "jpeg", "jpg", "gif", "webp"];

const NOT_AN_IMAGE: &str =
    "Upload a valid image. The file you uploaded was either not an image or a corrupted image.";

/// File extension for a stored image, `None` for formats we do not keep
#[must_use]
pub const fn extension(format: ImageFormat) -> Option<&'static str> {
    match format {
        ImageFormat::Png => Some("png"),
        ImageFormat::Jpeg => Some("jpg"),
        ImageFormat::Gif => Some("gif"),
        ImageFormat::WebP => Some("webp"),
        _ => None,
    }
}

/// A decoded upload, not yet written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Raw file contents
    pub bytes: Vec<u8>,
    /// Format detected from the contents
    pub format: ImageFormat,
}

impl DecodedImage {
    /// File extension matching the detected format
    #[must_use]
    pub fn extension(&self) -> &'static str {
        extension(self.format).unwrap_or("bin")
    }
}

/// Decode `data:image/<type>;base64,<payload>`
///
/// The payload must decode as a complete PNG, JPEG, GIF or `WebP` image;
/// the declared subtype is not trusted for the stored extension.
///
/// # Errors
///
/// Returns a user-facing message when the URI, payload, or image is invalid
pub fn decode_data_uri(value: &str) -> Result<DecodedImage, &'static str> {
    let invalid = "Upload a valid image encoded as a base64 data URI.";
    let rest = value.trim().strip_prefix("data:image/").ok_or(invalid)?;
    let (subtype, payload) = rest.split_once(";base64,").ok_or(invalid)?;
    if !ACCEPTED_SUBTYPES.contains(&subtype.to_ascii_lowercase().as_str()) {
        return Err("Unsupported image type.");
    }

    let bytes = STANDARD.decode(payload.trim()).map_err(|_| invalid)?;
    if bytes.is_empty() {
        return Err("The submitted file is empty.");
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err("The submitted image is too large.");
    }

    let format = image::guess_format(&bytes).map_err(|_| NOT_AN_IMAGE)?;
    if extension(format).is_none() {
        return Err("Unsupported image type.");
    }
    image::load_from_memory_with_format(&bytes, format).map_err(|e| {
        debug!(error = %e, "Rejected undecodable image upload");
        NOT_AN_IMAGE
    })?;
    Ok(DecodedImage { bytes, format })
}

/// Local media directory served under the media URL prefix
#[derive(Debug, Clone)]
pub struct MediaStorage {
    root: PathBuf,
    url_prefix: String,
}

impl MediaStorage {
    /// Storage rooted at `config.root`, served at `config.url`
    #[must_use]
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            root: config.root.clone(),
            url_prefix: config.url.clone(),
        }
    }

    /// Filesystem root
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write a recipe image and return its path relative to the media root
    ///
    /// # Errors
    ///
    /// Returns a storage error if the directory or file cannot be written
    pub async fn save_recipe_image(&self, image: &DecodedImage) -> AppResult<String> {
        let relative = format!(
            "{RECIPE_IMAGE_DIR}/{}.{}",
            Uuid::new_v4().simple(),
            image.extension()
        );
        let path = self.root.join(&relative);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                AppError::storage(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }
        tokio::fs::write(&path, &image.bytes)
            .await
            .map_err(|e| AppError::storage(format!("Failed to write {}: {e}", path.display())))?;
        debug!(path = %relative, bytes = image.bytes.len(), "Stored recipe image");
        Ok(relative)
    }

    /// Delete a stored file; failures are logged, not returned
    pub async fn remove(&self, relative: &str) {
        if relative.is_empty() || relative.contains("..") {
            return;
        }
        if let Err(e) = tokio::fs::remove_file(self.root.join(relative)).await {
            warn!(path = %relative, error = %e, "Failed to remove media file");
        }
    }

    /// Public URL of a stored file
    #[must_use]
    pub fn url(&self, relative: &str) -> String {
        format!("{}{relative}", self.url_prefix)
    }
}
