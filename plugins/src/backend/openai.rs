use async_trait::async_trait;
use serde_json::{json, Value};

use batchgen_core::api::{
    AnalysisOptions, AnalysisService, AspectRatio, ConnectionCheck, GenerationService,
    ImagePayload, ImageSize, ServiceError, SharedContext,
};

use crate::http::{AuthStyle, JsonClient, CHECK_TIMEOUT_MS};
use crate::prompt::build_system_prompt;

/// Client for gateways exposing the OpenAI chat/images routes.
pub struct OpenAiCompatClient {
    client: JsonClient,
    base_url: String,
    analysis_model: String,
    image_model: String,
    size: String,
    analysis_timeout_ms: u64,
    generation_timeout_ms: u64,
}

pub struct OpenAiSettings {
    pub api_key: String,
    pub base_url: String,
    pub analysis_model: String,
    pub image_model: String,
    pub aspect_ratio: AspectRatio,
    pub image_size: ImageSize,
    pub analysis_timeout_ms: u64,
    pub generation_timeout_ms: u64,
}

/// `WIDTHxHEIGHT` for the images endpoint.
pub fn map_size(aspect_ratio: AspectRatio, image_size: ImageSize) -> String {
    let base: u32 = match image_size {
        ImageSize::OneK => 1024,
        ImageSize::TwoK => 1536,
        ImageSize::FourK => 2048,
    };
    let long: u32 = match image_size {
        ImageSize::FourK => 2048,
        _ => 1792,
    };
    let (w, h) = match aspect_ratio {
        AspectRatio::Square => (base, base),
        AspectRatio::Portrait => (base, base * 4 / 3),
        AspectRatio::Landscape => (base * 4 / 3, base),
        AspectRatio::Wide => (long, base),
        AspectRatio::Tall => (base, long),
    };
    format!("{w}x{h}")
}

// content 可能是字符串，也可能是 [{type, text}] 数组
fn extract_chat_text(json: &Value) -> String {
    match json.pointer("/choices/0/message/content") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|c| c.get("text").and_then(Value::as_str))
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        _ => String::new(),
    }
}

impl OpenAiCompatClient {
    pub fn new(settings: OpenAiSettings) -> anyhow::Result<Self> {
        Ok(Self {
            client: JsonClient::new(settings.api_key, AuthStyle::Bearer)?,
            base_url: settings.base_url,
            analysis_model: settings.analysis_model,
            image_model: settings.image_model,
            size: map_size(settings.aspect_ratio, settings.image_size),
            analysis_timeout_ms: settings.analysis_timeout_ms,
            generation_timeout_ms: settings.generation_timeout_ms,
        })
    }

    fn route(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl AnalysisService for OpenAiCompatClient {
    fn name(&self) -> &str {
        "openai-compat"
    }

    async fn analyze(
        &self,
        image: &ImagePayload,
        options: &AnalysisOptions,
    ) -> anyhow::Result<String> {
        let body = json!({
            "model": self.analysis_model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": build_system_prompt(options) },
                    { "type": "image_url", "image_url": { "url": image.data_uri() } },
                ],
            }],
        });
        let json = self
            .client
            .post_json(
                &self.route("/v1/chat/completions"),
                &body,
                self.analysis_timeout_ms,
            )
            .await?;
        Ok(extract_chat_text(&json))
    }
}

#[async_trait]
impl GenerationService for OpenAiCompatClient {
    fn name(&self) -> &str {
        "openai-compat"
    }

    async fn generate(
        &self,
        prompt: &str,
        shared: Option<&SharedContext>,
    ) -> anyhow::Result<String> {
        if shared.is_some() {
            tracing::debug!("images endpoint takes no reference image; sending prompt only");
        }
        let body = json!({
            "model": self.image_model,
            "prompt": prompt,
            "size": self.size,
            "response_format": "b64_json",
        });
        let json = self
            .client
            .post_json(
                &self.route("/v1/images/generations"),
                &body,
                self.generation_timeout_ms,
            )
            .await?;

        let b64 = json
            .pointer("/data/0/b64_json")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ServiceError::EmptyResult("no b64_json image data returned".into()))?;
        Ok(format!("data:image/png;base64,{b64}"))
    }
}

#[async_trait]
impl ConnectionCheck for OpenAiCompatClient {
    fn name(&self) -> &str {
        "openai-compat"
    }

    async fn check(&self) -> anyhow::Result<()> {
        let body = json!({
            "model": self.analysis_model,
            "messages": [{ "role": "user", "content": "ping" }],
        });
        self.client
            .post_json(&self.route("/v1/chat/completions"), &body, CHECK_TIMEOUT_MS)
            .await?;
        Ok(())
    }
}
