use serde::Serialize;

use super::traits::AnalysisService;
use super::types::{AnalysisOptions, ImagePayload};
use crate::error::ServiceError;
use crate::parser::{MultiStrategyPromptParser, ParsedTask, StrategyKind};
use crate::text::{extract_report, normalize_escapes};

/// Everything recovered from one analysis call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutcome {
    pub report: String,
    pub prompts: Vec<ParsedTask>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<StrategyKind>,
    pub raw_text: String,
}

/// Runs the analysis collaborator once and parses its answer.
///
/// A collaborator failure or a blank answer is a single error for the whole
/// attempt; there are no partial results. An answer without prompt blocks is
/// not an error: `prompts` is simply empty.
#[tracing::instrument(skip_all, fields(service = service.name()))]
pub async fn analyze_reference(
    service: &dyn AnalysisService,
    image: &ImagePayload,
    options: &AnalysisOptions,
) -> Result<AnalysisOutcome, ServiceError> {
    let raw_text = service.analyze(image, options).await.map_err(|e| {
        tracing::warn!(error = %e, "analysis call failed");
        match e.downcast::<ServiceError>() {
            Ok(service_err) => service_err,
            Err(other) => ServiceError::Other(other),
        }
    })?;

    if raw_text.trim().is_empty() {
        return Err(ServiceError::EmptyResult(format!(
            "{} returned no analysis text",
            service.name()
        )));
    }

    let text = normalize_escapes(&raw_text);
    let report = match extract_report(&text) {
        r if r.is_empty() => text.trim().to_string(),
        r => r,
    };
    let outcome = MultiStrategyPromptParser::new().parse_outcome(&text);

    tracing::info!(
        prompts = outcome.tasks.len(),
        strategy = ?outcome.strategy,
        report_chars = report.chars().count(),
        "analysis parsed"
    );

    Ok(AnalysisOutcome {
        report,
        prompts: outcome.tasks,
        strategy: outcome.strategy,
        raw_text,
    })
}
