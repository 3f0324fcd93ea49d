use std::path::Path;

use batchgen_core::api::{
    analyze_reference, AnalysisOptions, AppConfig, CliError, ImagePayload, ReferenceImage,
    ReviewDraft,
};
use batchgen_plugins::build_services;

use super::cli::AnalyzeArgs;
use super::parse::render_tasks;
use crate::utils::write_json;

fn options_for(cfg: &AppConfig, args: &AnalyzeArgs) -> AnalysisOptions {
    let mut gen = cfg.generation.clone();
    if let Some(brand) = args.brand.as_ref() {
        gen.brand_name = Some(brand.clone());
    }
    if let Some(req) = args.requirements.as_ref() {
        gen.custom_requirements = Some(req.clone());
    }
    if let Some(lang) = args.language {
        gen.language = lang.into();
    }
    AnalysisOptions::from_config(&gen)
}

/// Loads the product image. No run exists yet, so failures are command errors.
pub async fn load_image(path: &Path) -> Result<ImagePayload, CliError> {
    ReferenceImage::from_path(path)
        .resolve()
        .await
        .map_err(|e| CliError::Command(format!("cannot load image {}: {e}", path.display())))
}

#[tracing::instrument(skip_all)]
pub async fn handle_analyze(args: AnalyzeArgs, cfg: &AppConfig) -> Result<i32, CliError> {
    let services = build_services(cfg).map_err(super::into_service_error)?;
    let image = load_image(&args.image).await?;
    let options = options_for(cfg, &args);

    tracing::info!(
        image = %args.image.display(),
        service = services.analysis.name(),
        "analysis started"
    );
    let outcome = analyze_reference(services.analysis.as_ref(), &image, &options).await?;

    println!("{}\n", outcome.report);
    if outcome.prompts.is_empty() {
        println!("no prompt blocks recognised in the analysis");
    }
    print!("{}", render_tasks(&outcome.prompts));

    if let Some(out) = args.out.as_deref() {
        let draft = ReviewDraft::from_parsed(outcome.prompts);
        write_json(out, &draft).await?;
        eprintln!("task list written to {}", out.display());
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::cli::LanguageArg;
    use batchgen_core::api::Language;

    #[tokio::test]
    async fn unreadable_image_is_command_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_image(&dir.path().join("missing.png")).await.unwrap_err();
        match err {
            CliError::Command(msg) => assert!(msg.contains("missing.png"), "{msg}"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn image_is_encoded_with_guessed_mime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shot.jpg");
        tokio::fs::write(&path, b"ABC").await.unwrap();
        let image = load_image(&path).await.unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.data_base64, "QUJD");
    }

    #[test]
    fn flags_override_config() {
        let mut cfg = AppConfig::default();
        cfg.generation.brand_name = Some("Old".into());
        let args = AnalyzeArgs {
            image: "a.png".into(),
            brand: Some("Lumen".into()),
            requirements: Some("  ".into()),
            language: Some(LanguageArg::En),
            out: None,
        };
        let opts = options_for(&cfg, &args);
        assert_eq!(opts.brand_name.as_deref(), Some("Lumen"));
        assert_eq!(opts.custom_requirements, None);
        assert_eq!(opts.language, Language::En);
    }
}
