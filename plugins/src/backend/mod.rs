//! HTTP collaborators for the two supported wire protocols.

pub mod gemini;
pub mod openai;

pub use gemini::GeminiClient;
pub use openai::OpenAiCompatClient;

use batchgen_core::api::{AuthMode, OFFICIAL_BASE_URL};

const OFFICIAL_HOST: &str = "generativelanguage.googleapis.com";

/// Trims whitespace and trailing slashes; blank falls back to the official base.
pub fn normalize_base(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        OFFICIAL_BASE_URL.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Appends `/v1beta` unless the base already ends with it.
pub fn v1beta_base(url: &str) -> String {
    let normalized = normalize_base(url);
    if normalized.ends_with("/v1beta") {
        normalized
    } else {
        format!("{normalized}/v1beta")
    }
}

pub fn is_official_base(url: &str) -> bool {
    reqwest::Url::parse(&normalize_base(url))
        .ok()
        .and_then(|u| u.host_str().map(|h| h.ends_with(OFFICIAL_HOST)))
        .unwrap_or(false)
}

/// Bearer auth when asked for, or when the base is not Google's own endpoint.
pub fn use_bearer(mode: AuthMode, base_url: &str) -> bool {
    mode == AuthMode::Bearer || !is_official_base(base_url)
}
