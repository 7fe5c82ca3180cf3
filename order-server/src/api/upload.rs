//! Image upload helpers
//!
//! Shared by the menu and site handlers. Uploaded images are validated,
//! re-encoded as JPEG and stored under the uploads dir with a
//! content-hash filename, so identical uploads dedupe naturally.
//!
//! Replacement protocol: callers write the new file and update the DB row
//! first, and only then delete the old file, never the other way around.

use sha2::{Digest, Sha256};
use std::io::Cursor;
use std::path::Path;

use crate::core::ServerState;
use crate::utils::AppError;

/// Maximum file size (5MB)
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Supported image formats
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// JPEG quality for dish images (keeps color appeal while bounding size)
const JPEG_QUALITY: u8 = 85;

/// Validate raw upload bytes
fn validate_image(data: &[u8], filename: &str) -> Result<(), AppError> {
    if data.is_empty() {
        return Err(AppError::validation("Empty file provided".to_string()));
    }
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::validation(format!(
            "File too large. Maximum size is {}MB",
            MAX_FILE_SIZE / 1024 / 1024
        )));
    }

    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .ok_or_else(|| {
            AppError::validation(format!("Invalid file extension for: {filename}"))
        })?;

    if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
        return Err(AppError::validation(format!(
            "Unsupported file format '{}'. Supported: {}",
            ext,
            SUPPORTED_FORMATS.join(", ")
        )));
    }
    Ok(())
}

/// Re-encode as JPEG with the standard quality setting
fn compress_to_jpeg(data: &[u8]) -> Result<Vec<u8>, AppError> {
    let img = image::load_from_memory(data)
        .map_err(|e| AppError::validation(format!("Invalid image: {e}")))?;

    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let rgb_img = img.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        rgb_img
            .write_with_encoder(encoder)
            .map_err(|e| AppError::internal(format!("Failed to compress image: {e}")))?;
    }
    Ok(buffer)
}

/// Validate, compress and store an uploaded image.
///
/// Returns the public path (`/uploads/<hash>.jpg`) to store in the DB.
pub fn save_image(state: &ServerState, data: &[u8], filename: &str) -> Result<String, AppError> {
    validate_image(data, filename)?;
    let compressed = compress_to_jpeg(data)?;

    let mut hasher = Sha256::new();
    hasher.update(&compressed);
    let hash = hex::encode(hasher.finalize());
    let stored_name = format!("{}.jpg", &hash[..16]);

    let uploads_dir = state.config.uploads_dir();
    std::fs::create_dir_all(&uploads_dir)
        .map_err(|e| AppError::internal(format!("Failed to create uploads directory: {e}")))?;

    let file_path = uploads_dir.join(&stored_name);
    if !file_path.exists() {
        std::fs::write(&file_path, &compressed)
            .map_err(|e| AppError::internal(format!("Failed to save file: {e}")))?;
    }

    tracing::info!(
        original_name = %filename,
        stored = %stored_name,
        size = compressed.len(),
        "Image uploaded"
    );

    Ok(format!("/uploads/{stored_name}"))
}

/// Best-effort removal of a previously stored image.
///
/// Only called after the replacing DB write has been confirmed; failures
/// are logged, never surfaced.
pub fn delete_image(state: &ServerState, public_path: &str) {
    let Some(name) = public_path.strip_prefix("/uploads/") else {
        return;
    };
    // Refuse anything that could walk out of the uploads dir
    if name.contains('/') || name.contains("..") {
        tracing::warn!(path = %public_path, "Refusing to delete suspicious upload path");
        return;
    }
    let file_path = state.config.uploads_dir().join(name);
    if file_path.exists()
        && let Err(e) = std::fs::remove_file(&file_path)
    {
        tracing::warn!(path = %public_path, error = %e, "Failed to delete old upload");
    }
}
