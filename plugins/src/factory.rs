use std::sync::Arc;

use anyhow::Result;

use batchgen_core::api::{
    AnalysisService, AppConfig, ConnectionCheck, GenerationService, RequestMode, ServiceError,
    ThirdPartyProtocol,
};

use crate::backend::gemini::GeminiSettings;
use crate::backend::openai::OpenAiSettings;
use crate::backend::{normalize_base, use_bearer, v1beta_base, GeminiClient, OpenAiCompatClient};
use crate::http::AuthStyle;

/// The collaborators a session needs, plus the connection check for the
/// same endpoint and credentials.
#[derive(Clone)]
pub struct Services {
    pub analysis: Arc<dyn AnalysisService>,
    pub generation: Arc<dyn GenerationService>,
    pub connection: Arc<dyn ConnectionCheck>,
}

impl Services {
    pub fn new(
        analysis: Arc<dyn AnalysisService>,
        generation: Arc<dyn GenerationService>,
        connection: Arc<dyn ConnectionCheck>,
    ) -> Self {
        Self {
            analysis,
            generation,
            connection,
        }
    }
}

pub fn build_services(cfg: &AppConfig) -> Result<Services> {
    let svc = &cfg.service;
    let api_key = svc.api_key.trim();
    if api_key.is_empty() {
        return Err(ServiceError::MissingCredential("api_key").into());
    }

    let (base, auth, protocol) = match svc.mode {
        RequestMode::Official => {
            let auth = if use_bearer(svc.auth_mode, &svc.base_url) {
                AuthStyle::Bearer
            } else {
                AuthStyle::ApiKeyHeader
            };
            (svc.base_url.as_str(), auth, ThirdPartyProtocol::Gemini)
        }
        RequestMode::ThirdParty => {
            if svc.third_party_url.trim().is_empty() {
                return Err(ServiceError::MissingCredential("third_party_url").into());
            }
            (svc.third_party_url.as_str(), AuthStyle::Both, svc.protocol)
        }
    };

    tracing::debug!(
        mode = ?svc.mode,
        protocol = ?protocol,
        auth = ?auth,
        "building service collaborators"
    );

    let generation_cfg = &cfg.generation;
    match protocol {
        ThirdPartyProtocol::Gemini => {
            let client = Arc::new(GeminiClient::new(GeminiSettings {
                api_key: api_key.to_string(),
                v1beta_base: v1beta_base(base),
                auth,
                analysis_model: svc.analysis_model.clone(),
                image_model: generation_cfg.model.clone(),
                aspect_ratio: generation_cfg.aspect_ratio,
                image_size: generation_cfg.image_size,
                analysis_timeout_ms: svc.analysis_timeout_ms,
                generation_timeout_ms: svc.generation_timeout_ms,
            })?);
            Ok(Services::new(client.clone(), client.clone(), client))
        }
        ThirdPartyProtocol::Openai => {
            let client = Arc::new(OpenAiCompatClient::new(OpenAiSettings {
                api_key: api_key.to_string(),
                base_url: normalize_base(base),
                analysis_model: svc.analysis_model.clone(),
                image_model: generation_cfg.model.clone(),
                aspect_ratio: generation_cfg.aspect_ratio,
                image_size: generation_cfg.image_size,
                analysis_timeout_ms: svc.analysis_timeout_ms,
                generation_timeout_ms: svc.generation_timeout_ms,
            })?);
            Ok(Services::new(client.clone(), client.clone(), client))
        }
    }
}
