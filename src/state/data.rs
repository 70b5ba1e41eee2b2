/// Shared data structures for the classification session
///
/// These structs represent the data model that flows between
/// file intake, the provider client and the UI layer.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::ParseModelError;

/// Inference model served by the classification provider
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ModelId {
    #[default]
    #[serde(rename = "resnet18")]
    ResNet18,
    #[serde(rename = "mobilenet_v2")]
    MobileNetV2,
    #[serde(rename = "efficientnet_b0")]
    EfficientNetB0,
    #[serde(rename = "densenet121")]
    DenseNet121,
}

impl ModelId {
    /// Every model the provider accepts, in menu order
    pub const ALL: [ModelId; 4] = [
        ModelId::ResNet18,
        ModelId::MobileNetV2,
        ModelId::EfficientNetB0,
        ModelId::DenseNet121,
    ];

    /// Identifier sent as the `model_name` query parameter
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelId::ResNet18 => "resnet18",
            ModelId::MobileNetV2 => "mobilenet_v2",
            ModelId::EfficientNetB0 => "efficientnet_b0",
            ModelId::DenseNet121 => "densenet121",
        }
    }

    /// Human-readable name for the model picker
    pub fn display_name(&self) -> &'static str {
        match self {
            ModelId::ResNet18 => "ResNet18",
            ModelId::MobileNetV2 => "MobileNet v2",
            ModelId::EfficientNetB0 => "EfficientNet B0",
            ModelId::DenseNet121 => "DenseNet121",
        }
    }
}

// The pick list renders options through Display
impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ModelId {
    type Err = ParseModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        ModelId::ALL
            .into_iter()
            .find(|model| model.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseModelError(s.to_string()))
    }
}

/// Downscaled, PNG-encoded copy of the selected image
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewImage {
    /// Complete PNG file, renderable without the original payload
    pub png: Arc<[u8]>,
    pub width: u32,
    pub height: u32,
}

/// The image picked by the user, ready for submission
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedImage {
    /// Filename only (e.g., "leaf_01.jpg")
    pub file_name: String,
    /// Raw file contents as read from disk
    pub payload: Arc<[u8]>,
    /// MIME type guessed from the payload (e.g., "image/jpeg")
    pub mime_type: &'static str,
    pub preview: PreviewImage,
}

/// Everything the provider needs for one classification
///
/// Built only by `SessionController::submit` and never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationRequest {
    pub image: SelectedImage,
    pub model: ModelId,
}

/// One ranked class returned by the provider
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PredictionEntry {
    /// Class label from the provider's vocabulary (e.g., "peppermint")
    #[serde(rename = "class")]
    pub class_label: String,
    /// Confidence as a percentage (0.0 to 100.0)
    pub probability: f64,
}

impl PredictionEntry {
    pub fn new(class_label: impl Into<String>, probability: f64) -> Self {
        Self {
            class_label: class_label.into(),
            probability,
        }
    }
}

/// Successful reply from the provider
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResponse {
    /// Ranked by descending probability, as delivered by the provider
    pub predictions: Vec<PredictionEntry>,
    pub is_mint: bool,
    /// Model the provider reports having used, if it said so
    pub model_used: Option<ModelId>,
}
