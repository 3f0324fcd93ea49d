use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub service: ServiceConfig,

    #[serde(default)]
    pub generation: GenerationConfig,

    #[serde(default)]
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    #[serde(default)]
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "batchgen_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Optional directory for log files. If empty or unset, uses OS temp dir.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: false,
            level: default_logging_level(),
            directory: None,
        }
    }
}

/// Which family of endpoints the collaborators talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestMode {
    #[default]
    Official,
    ThirdParty,
}

/// Wire protocol spoken by a third-party gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThirdPartyProtocol {
    #[default]
    Gemini,
    Openai,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    #[default]
    ApiKey,
    Bearer,
}

pub const OFFICIAL_BASE_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub mode: RequestMode,

    #[serde(default)]
    pub protocol: ThirdPartyProtocol,

    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Gateway root used when `mode = "third_party"`.
    #[serde(default)]
    pub third_party_url: String,

    #[serde(default)]
    pub auth_mode: AuthMode,

    #[serde(default = "default_analysis_model")]
    pub analysis_model: String,

    #[serde(default = "default_analysis_timeout_ms")]
    pub analysis_timeout_ms: u64,

    #[serde(default = "default_generation_timeout_ms")]
    pub generation_timeout_ms: u64,
}

fn default_base_url() -> String {
    OFFICIAL_BASE_URL.to_string()
}

fn default_analysis_model() -> String {
    "gemini-3-flash-preview".to_string()
}

fn default_analysis_timeout_ms() -> u64 {
    30_000
}

fn default_generation_timeout_ms() -> u64 {
    60_000
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            mode: RequestMode::default(),
            protocol: ThirdPartyProtocol::default(),
            api_key: String::new(),
            base_url: default_base_url(),
            third_party_url: String::new(),
            auth_mode: AuthMode::default(),
            analysis_model: default_analysis_model(),
            analysis_timeout_ms: default_analysis_timeout_ms(),
            generation_timeout_ms: default_generation_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "3:4")]
    Portrait,
    #[serde(rename = "4:3")]
    Landscape,
    #[serde(rename = "16:9")]
    Wide,
    #[serde(rename = "9:16")]
    Tall,
}

impl AspectRatio {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Portrait => "3:4",
            Self::Landscape => "4:3",
            Self::Wide => "16:9",
            Self::Tall => "9:16",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImageSize {
    #[serde(rename = "1K")]
    OneK,
    #[default]
    #[serde(rename = "2K")]
    TwoK,
    #[serde(rename = "4K")]
    FourK,
}

impl ImageSize {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OneK => "1K",
            Self::TwoK => "2K",
            Self::FourK => "4K",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Zh,
    En,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_image_model")]
    pub model: String,

    #[serde(default)]
    pub aspect_ratio: AspectRatio,

    #[serde(default)]
    pub image_size: ImageSize,

    #[serde(default)]
    pub language: Language,

    #[serde(default)]
    pub brand_name: Option<String>,

    #[serde(default)]
    pub custom_requirements: Option<String>,

    #[serde(default = "default_style")]
    pub visual_style: String,

    #[serde(default = "default_style")]
    pub typography_style: String,
}

fn default_image_model() -> String {
    "gemini-3-pro-image-preview".to_string()
}

fn default_style() -> String {
    "auto".to_string()
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: default_image_model(),
            aspect_ratio: AspectRatio::default(),
            image_size: ImageSize::default(),
            language: Language::default(),
            brand_name: None,
            custom_requirements: None,
            visual_style: default_style(),
            typography_style: default_style(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Cap on in-flight generation requests. Unset means every eligible task
    /// is dispatched at once.
    #[serde(default)]
    pub max_concurrency: Option<usize>,

    #[serde(default = "default_progress_bar")]
    pub progress_bar: bool,
}

fn default_progress_bar() -> bool {
    true
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrency: None,
            progress_bar: default_progress_bar(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.service.mode, RequestMode::Official);
        assert_eq!(cfg.service.base_url, OFFICIAL_BASE_URL);
        assert_eq!(cfg.generation.aspect_ratio, AspectRatio::Square);
        assert_eq!(cfg.generation.image_size, ImageSize::TwoK);
        assert!(cfg.batch.max_concurrency.is_none());
        assert!(cfg.logging.console);
    }

    #[test]
    fn parses_service_and_generation_sections() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [service]
            mode = "third_party"
            protocol = "openai"
            third_party_url = "https://gw.example.com/"
            auth_mode = "bearer"

            [generation]
            aspect_ratio = "9:16"
            image_size = "4K"
            language = "en"

            [batch]
            max_concurrency = 4
            "#,
        )
        .unwrap();

        assert_eq!(cfg.service.mode, RequestMode::ThirdParty);
        assert_eq!(cfg.service.protocol, ThirdPartyProtocol::Openai);
        assert_eq!(cfg.service.auth_mode, AuthMode::Bearer);
        assert_eq!(cfg.generation.aspect_ratio, AspectRatio::Tall);
        assert_eq!(cfg.generation.image_size.as_str(), "4K");
        assert_eq!(cfg.generation.language, Language::En);
        assert_eq!(cfg.batch.max_concurrency, Some(4));
    }
}
