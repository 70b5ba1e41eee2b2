/// File intake module
///
/// This module handles:
/// - Reading user-picked image files
/// - Validating that they decode as images
/// - Generating the PNG preview shown before submission

pub mod loader;
pub mod preview;

pub use loader::{load_selected_image, IMAGE_EXTENSIONS};
