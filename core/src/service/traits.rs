use async_trait::async_trait;

use super::types::{AnalysisOptions, ImagePayload, SharedContext};

/// Turns a product image into free-form model text (report + prompt blocks).
#[async_trait]
pub trait AnalysisService: Send + Sync {
    fn name(&self) -> &str;
    async fn analyze(
        &self,
        image: &ImagePayload,
        options: &AnalysisOptions,
    ) -> anyhow::Result<String>;
}

/// Produces one image reference (URL or `data:` URI) per prompt.
///
/// Timeouts and aborts belong to the implementation; callers simply await the
/// outcome.
#[async_trait]
pub trait GenerationService: Send + Sync {
    fn name(&self) -> &str;
    async fn generate(&self, prompt: &str, shared: Option<&SharedContext>)
        -> anyhow::Result<String>;
}

/// Cheap round trip confirming that credentials and endpoint are usable.
#[async_trait]
pub trait ConnectionCheck: Send + Sync {
    fn name(&self) -> &str;
    async fn check(&self) -> anyhow::Result<()>;
}
