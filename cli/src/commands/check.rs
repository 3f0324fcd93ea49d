use batchgen_core::api::{AppConfig, CliError};
use batchgen_plugins::build_services;

/// Builds the configured collaborators and pings their endpoint once.
pub async fn check_connection(cfg: &AppConfig) -> Result<String, CliError> {
    let services = build_services(cfg).map_err(super::into_service_error)?;
    let name = services.connection.name().to_string();
    services
        .connection
        .check()
        .await
        .map_err(super::into_service_error)?;
    Ok(name)
}

#[tracing::instrument(skip_all, fields(mode = ?cfg.service.mode))]
pub async fn handle_check(cfg: &AppConfig) -> Result<i32, CliError> {
    let name = check_connection(cfg).await?;
    tracing::info!(service = %name, "connection check passed");
    println!("connection ok ({name})");
    Ok(0)
}
