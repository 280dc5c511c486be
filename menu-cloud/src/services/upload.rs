//! Image uploads
//!
//! Files are validated (size, extension, decodable content) and written to
//! the upload directory as `<uuid-hex>_<sanitised name>`. The returned path
//! is what gets persisted; the directory is served under `/static`.

use std::path::Path;

use shared::error::{AppError, ErrorCode};

use crate::config::Config;

/// Supported image formats
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Public URL prefix of the upload directory
pub const STATIC_PREFIX: &str = "/static";

/// A file part received from a multipart form
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub data: Vec<u8>,
}

fn validate_image(upload: &ImageUpload, max_size: usize) -> Result<(), AppError> {
    if upload.data.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::InvalidImageFile,
            "Empty file provided",
        ));
    }

    if upload.data.len() > max_size {
        return Err(AppError::with_message(
            ErrorCode::FileTooLarge,
            format!(
                "File too large. Maximum size is {} bytes ({}MB)",
                max_size,
                max_size / 1024 / 1024
            ),
        ));
    }

    let ext = Path::new(&upload.file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
        return Err(AppError::with_message(
            ErrorCode::UnsupportedFileFormat,
            format!(
                "Unsupported file format '{}'. Supported: {}",
                ext,
                SUPPORTED_FORMATS.join(", ")
            ),
        ));
    }

    image::load_from_memory(&upload.data).map_err(|e| {
        AppError::with_message(
            ErrorCode::InvalidImageFile,
            format!("Invalid image file ({ext}): {e}"),
        )
    })?;

    Ok(())
}

/// Keep the base name only, with anything outside `[A-Za-z0-9._-]` replaced
fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Validate and store an image; returns its public path
pub async fn save_image(config: &Config, upload: &ImageUpload) -> Result<String, AppError> {
    validate_image(upload, config.max_image_size_bytes)?;

    let stored_name = format!(
        "{}_{}",
        uuid::Uuid::new_v4().simple(),
        sanitize_file_name(&upload.file_name)
    );

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .map_err(|e| storage_failed("create upload directory", e))?;
    tokio::fs::write(config.upload_dir.join(&stored_name), &upload.data)
        .await
        .map_err(|e| storage_failed("write file", e))?;

    tracing::info!(
        original_name = %upload.file_name,
        stored_name = %stored_name,
        size = upload.data.len(),
        "Image uploaded"
    );

    Ok(format!("{STATIC_PREFIX}/{stored_name}"))
}

fn storage_failed(action: &str, e: std::io::Error) -> AppError {
    tracing::error!(error = %e, "Failed to {action}");
    AppError::new(ErrorCode::FileStorageFailed)
}
