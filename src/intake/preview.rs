/// Preview generation for picked images
/// Produces a downscaled PNG that the UI can render on its own
use image::{imageops::FilterType, DynamicImage, ImageFormat};
use std::io::Cursor;
use std::sync::Arc;

use crate::state::data::PreviewImage;

/// Longest side of generated previews unless configured otherwise
pub const DEFAULT_PREVIEW_SIZE: u32 = 512;

/// Encode a decoded image as a PNG preview
///
/// Images larger than `max_size` on either side are shrunk to fit,
/// preserving aspect ratio. Smaller images are encoded as-is.
pub fn encode_preview(img: &DynamicImage, max_size: u32) -> Result<PreviewImage, image::ImageError> {
    let scaled = if img.width() > max_size || img.height() > max_size {
        img.resize(max_size, max_size, FilterType::Lanczos3)
    } else {
        img.clone()
    };

    let mut png = Vec::new();
    scaled.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

    Ok(PreviewImage {
        png: Arc::from(png),
        width: scaled.width(),
        height: scaled.height(),
    })
}
