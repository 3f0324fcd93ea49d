use serde::{Deserialize, Serialize};

use crate::config::{AspectRatio, GenerationConfig, ImageSize, Language};

/// Base64-encoded image together with its mime type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    pub data_base64: String,
    pub mime_type: String,
}

impl ImagePayload {
    pub fn new(data_base64: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            data_base64: data_base64.into(),
            mime_type: mime_type.into(),
        }
    }

    /// `data:{mime};base64,{data}`
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data_base64)
    }
}

/// Reference payload applied identically to every task of one run.
pub type SharedContext = ImagePayload;

/// Knobs forwarded to the analysis collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOptions {
    pub language: Language,
    pub aspect_ratio: AspectRatio,
    pub image_size: ImageSize,
    #[serde(default)]
    pub brand_name: Option<String>,
    #[serde(default)]
    pub custom_requirements: Option<String>,
    pub visual_style: String,
    pub typography_style: String,
}

impl AnalysisOptions {
    pub fn from_config(cfg: &GenerationConfig) -> Self {
        Self {
            language: cfg.language,
            aspect_ratio: cfg.aspect_ratio,
            image_size: cfg.image_size,
            brand_name: non_blank(cfg.brand_name.as_deref()),
            custom_requirements: non_blank(cfg.custom_requirements.as_deref()),
            visual_style: cfg.visual_style.clone(),
            typography_style: cfg.typography_style.clone(),
        }
    }
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self::from_config(&GenerationConfig::default())
    }
}

fn non_blank(s: Option<&str>) -> Option<String> {
    s.map(str::trim).filter(|s| !s.is_empty()).map(str::to_string)
}
