/// Image file loader
///
/// Reads a user-picked file, checks that it decodes as an image, and builds
/// the `SelectedImage` the session controller takes ownership of.
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task;
use tracing::debug;

use super::preview::encode_preview;
use crate::error::IntakeError;
use crate::state::data::SelectedImage;

/// Extensions offered in the file dialog
pub const IMAGE_EXTENSIONS: [&str; 8] = ["png", "jpg", "jpeg", "bmp", "gif", "webp", "tif", "tiff"];

/// Load an image file and prepare its preview
///
/// # Arguments
/// * `path` - File picked by the user
/// * `preview_size` - Longest side of the generated preview
pub async fn load_selected_image(path: PathBuf, preview_size: u32) -> Result<SelectedImage, IntakeError> {
    let payload = tokio::fs::read(&path).await.map_err(|e| IntakeError::Read {
        path: path.clone(),
        message: e.to_string(),
    })?;

    if payload.is_empty() {
        return Err(IntakeError::Empty(path));
    }

    // Spawn blocking because decoding and resizing are CPU-intensive
    let worker_path = path.clone();
    task::spawn_blocking(move || build_selected_image(&worker_path, payload, preview_size))
        .await
        .map_err(|e| IntakeError::Undecodable {
            path,
            message: format!("Task join error: {}", e),
        })?
}

/// Blocking implementation of image decoding
fn build_selected_image(path: &Path, payload: Vec<u8>, preview_size: u32) -> Result<SelectedImage, IntakeError> {
    let undecodable = |e: image::ImageError| IntakeError::Undecodable {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let format = image::guess_format(&payload).map_err(undecodable)?;
    let img = image::load_from_memory_with_format(&payload, format).map_err(undecodable)?;
    let preview = encode_preview(&img, preview_size).map_err(undecodable)?;

    debug!(
        "Decoded {} as {:?}: {}x{}",
        path.display(),
        format,
        img.width(),
        img.height()
    );

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "image".to_string());

    Ok(SelectedImage {
        file_name,
        payload: Arc::from(payload),
        mime_type: format.to_mime_type(),
        preview,
    })
}
