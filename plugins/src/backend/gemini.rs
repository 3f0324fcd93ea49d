use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};

use batchgen_core::api::{
    AnalysisOptions, AnalysisService, AspectRatio, ConnectionCheck, GenerationService,
    ImagePayload, ImageSize, ServiceError, SharedContext,
};

use crate::http::{AuthStyle, JsonClient, CHECK_TIMEOUT_MS};
use crate::prompt::build_system_prompt;

const ANALYSIS_MAX_OUTPUT_TOKENS: u32 = 8192;
const CHECK_MAX_OUTPUT_TOKENS: u32 = 8;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<Value>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    Inline {
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    data: String,
    mime_type: String,
}

impl From<&ImagePayload> for Part {
    fn from(image: &ImagePayload) -> Self {
        Part::Inline {
            inline_data: InlineData {
                data: image.data_base64.clone(),
                mime_type: image.mime_type.clone(),
            },
        }
    }
}

fn response_parts(json: &Value) -> &[Value] {
    json.pointer("/candidates/0/content/parts")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn extract_text(json: &Value) -> String {
    response_parts(json)
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join("")
}

fn extract_inline_image(json: &Value) -> Option<&str> {
    response_parts(json)
        .iter()
        .filter_map(|p| p.pointer("/inlineData/data").and_then(Value::as_str))
        .find(|data| !data.is_empty())
}

/// Client for the `models/{model}:generateContent` protocol, used both for
/// the official endpoint and for Gemini-compatible gateways.
pub struct GeminiClient {
    client: JsonClient,
    v1beta_base: String,
    analysis_model: String,
    image_model: String,
    aspect_ratio: AspectRatio,
    image_size: ImageSize,
    analysis_timeout_ms: u64,
    generation_timeout_ms: u64,
}

pub struct GeminiSettings {
    pub api_key: String,
    pub v1beta_base: String,
    pub auth: AuthStyle,
    pub analysis_model: String,
    pub image_model: String,
    pub aspect_ratio: AspectRatio,
    pub image_size: ImageSize,
    pub analysis_timeout_ms: u64,
    pub generation_timeout_ms: u64,
}

impl GeminiClient {
    pub fn new(settings: GeminiSettings) -> anyhow::Result<Self> {
        Ok(Self {
            client: JsonClient::new(settings.api_key, settings.auth)?,
            v1beta_base: settings.v1beta_base,
            analysis_model: settings.analysis_model,
            image_model: settings.image_model,
            aspect_ratio: settings.aspect_ratio,
            image_size: settings.image_size,
            analysis_timeout_ms: settings.analysis_timeout_ms,
            generation_timeout_ms: settings.generation_timeout_ms,
        })
    }

    fn endpoint(&self, model: &str) -> anyhow::Result<String> {
        let mut url = reqwest::Url::parse(&self.v1beta_base)?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("base url cannot carry a path: {}", self.v1beta_base))?
            .pop_if_empty()
            .push("models")
            .push(&format!("{model}:generateContent"));
        Ok(url.to_string())
    }

    async fn generate_content(
        &self,
        model: &str,
        parts: Vec<Part>,
        generation_config: Value,
        timeout_ms: u64,
    ) -> anyhow::Result<Value> {
        let url = self.endpoint(model)?;
        let body = GenerateContentRequest {
            contents: vec![Content { parts }],
            generation_config: Some(generation_config),
        };
        let json = self.client.post_json(&url, &body, timeout_ms).await?;
        if let Some(err) = json.get("error") {
            return Err(ServiceError::Http(format!("model returned error: {err}")).into());
        }
        Ok(json)
    }
}

#[async_trait]
impl AnalysisService for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn analyze(
        &self,
        image: &ImagePayload,
        options: &AnalysisOptions,
    ) -> anyhow::Result<String> {
        let parts = vec![
            Part::Text {
                text: build_system_prompt(options),
            },
            Part::from(image),
        ];
        let json = self
            .generate_content(
                &self.analysis_model,
                parts,
                json!({ "maxOutputTokens": ANALYSIS_MAX_OUTPUT_TOKENS }),
                self.analysis_timeout_ms,
            )
            .await?;
        Ok(extract_text(&json))
    }
}

#[async_trait]
impl GenerationService for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(
        &self,
        prompt: &str,
        shared: Option<&SharedContext>,
    ) -> anyhow::Result<String> {
        let mut parts = Vec::with_capacity(2);
        if let Some(reference) = shared {
            parts.push(Part::from(reference));
        }
        parts.push(Part::Text {
            text: prompt.to_string(),
        });

        let json = self
            .generate_content(
                &self.image_model,
                parts,
                json!({
                    "imageConfig": {
                        "aspectRatio": self.aspect_ratio.as_str(),
                        "imageSize": self.image_size.as_str(),
                    }
                }),
                self.generation_timeout_ms,
            )
            .await?;

        let data = extract_inline_image(&json)
            .ok_or_else(|| ServiceError::EmptyResult("No image data found.".into()))?;
        Ok(format!("data:image/png;base64,{data}"))
    }
}

#[async_trait]
impl ConnectionCheck for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    /// 用分析模型发送一个极短的 "ping"，只要求 2xx 且没有 error 字段
    async fn check(&self) -> anyhow::Result<()> {
        self.generate_content(
            &self.analysis_model,
            vec![Part::Text {
                text: "ping".to_string(),
            }],
            json!({ "maxOutputTokens": CHECK_MAX_OUTPUT_TOKENS }),
            CHECK_TIMEOUT_MS,
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn settings(base: &str) -> GeminiSettings {
        GeminiSettings {
            api_key: "k-test".into(),
            v1beta_base: format!("{base}/v1beta"),
            auth: AuthStyle::ApiKeyHeader,
            analysis_model: "gemini-3-flash-preview".into(),
            image_model: "gemini-3-pro-image-preview".into(),
            aspect_ratio: AspectRatio::Portrait,
            image_size: ImageSize::TwoK,
            analysis_timeout_ms: 1_000,
            generation_timeout_ms: 1_000,
        }
    }

    #[test]
    fn endpoint_encodes_model_segment() {
        let client = GeminiClient::new(settings("https://gw.example.com")).unwrap();
        assert_eq!(
            client.endpoint("gemini-3-pro-image-preview").unwrap(),
            "https://gw.example.com/v1beta/models/gemini-3-pro-image-preview:generateContent"
        );
        assert!(client
            .endpoint("google/gemini")
            .unwrap()
            .ends_with("/models/google%2Fgemini:generateContent"));
    }

    #[tokio::test]
    async fn generate_sends_reference_then_prompt() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/v1beta/models/gemini-3-pro-image-preview:generateContent")
            .match_header("x-goog-api-key", "k-test")
            .match_body(Matcher::Json(json!({
                "contents": [{"parts": [
                    {"inlineData": {"data": "UkVG", "mimeType": "image/png"}},
                    {"text": "a poster"}
                ]}],
                "generationConfig": {"imageConfig": {"aspectRatio": "3:4", "imageSize": "2K"}}
            })))
            .with_status(200)
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"here"},{"inlineData":{"data":"SU1H","mimeType":"image/png"}}]}}]}"#)
            .create_async()
            .await;

        let client = GeminiClient::new(settings(&server.url())).unwrap();
        let reference = SharedContext::new("UkVG", "image/png");
        let url = client.generate("a poster", Some(&reference)).await.unwrap();

        assert_eq!(url, "data:image/png;base64,SU1H");
        m.assert_async().await;
    }

    #[tokio::test]
    async fn generate_without_image_part_fails() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", Matcher::Any)
            .with_status(200)
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"I cannot draw that"}]}}]}"#)
            .create_async()
            .await;

        let client = GeminiClient::new(settings(&server.url())).unwrap();
        let err = client.generate("x", None).await.unwrap_err();
        assert!(err.to_string().contains("No image data found."));
    }

    #[tokio::test]
    async fn analyze_joins_text_parts() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/v1beta/models/gemini-3-flash-preview:generateContent")
            .match_body(Matcher::PartialJson(json!({
                "generationConfig": {"maxOutputTokens": 8192}
            })))
            .with_status(200)
            .with_body(r##"{"candidates":[{"content":{"parts":[{"text":"# Product "},{"text":"Analysis Report"}]}}]}"##)
            .create_async()
            .await;

        let client = GeminiClient::new(settings(&server.url())).unwrap();
        let text = client
            .analyze(&ImagePayload::new("AAAA", "image/png"), &AnalysisOptions::default())
            .await
            .unwrap();

        assert_eq!(text, "# Product Analysis Report");
        m.assert_async().await;
    }

    #[tokio::test]
    async fn error_payload_is_reported() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", Matcher::Any)
            .with_status(200)
            .with_body(r#"{"error":{"code":400,"message":"API key not valid"}}"#)
            .create_async()
            .await;

        let client = GeminiClient::new(settings(&server.url())).unwrap();
        let err = client.generate("x", None).await.unwrap_err();
        assert!(err.to_string().contains("API key not valid"));
    }

    #[tokio::test]
    async fn check_pings_analysis_model() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/v1beta/models/gemini-3-flash-preview:generateContent")
            .match_header("x-goog-api-key", "k-test")
            .match_body(Matcher::Json(json!({
                "contents": [{"parts": [{"text": "ping"}]}],
                "generationConfig": {"maxOutputTokens": 8}
            })))
            .with_status(200)
            .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"pong"}]}}]}"#)
            .create_async()
            .await;

        let client = GeminiClient::new(settings(&server.url())).unwrap();
        client.check().await.unwrap();
        m.assert_async().await;
    }

    #[tokio::test]
    async fn check_reports_rejected_key() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", Matcher::Any)
            .with_status(403)
            .with_body(r#"{"error":{"message":"API key not valid"}}"#)
            .create_async()
            .await;

        let client = GeminiClient::new(settings(&server.url())).unwrap();
        let msg = format!("{:#}", client.check().await.unwrap_err());
        assert!(msg.contains("status=403"), "{msg}");
    }
}
