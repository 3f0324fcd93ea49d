use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Serialize;
use tokio::io::AsyncReadExt;

use batchgen_core::api::{BatchTask, CliError, ParsedTask, ReviewDraft};

/// Reads the whole file, or stdin when no path is given.
pub async fn read_text(input: Option<&Path>) -> Result<String, CliError> {
    match input {
        Some(path) => tokio::fs::read_to_string(path).await.map_err(|e| {
            CliError::Command(format!("failed to read {}: {e}", path.display()))
        }),
        None => {
            let mut buf = String::new();
            tokio::io::stdin().read_to_string(&mut buf).await?;
            Ok(buf)
        }
    }
}

pub async fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), CliError> {
    let body = serde_json::to_string_pretty(value)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, body).await?;
    tracing::debug!(path = %path.display(), "json written");
    Ok(())
}

/// Reads a reviewed task list. Hand edits may reintroduce literal escapes,
/// so every entry goes through the same normalisation as a fresh parse.
pub async fn read_task_list(path: &Path) -> Result<Vec<ParsedTask>, CliError> {
    let raw = read_text(Some(path)).await?;
    let tasks: Vec<ParsedTask> = serde_json::from_str(&raw)
        .map_err(|e| CliError::Command(format!("invalid task list {}: {e}", path.display())))?;
    Ok(ReviewDraft::from_parsed(tasks).into_tasks())
}

/// Splits `data:{mime};base64,{payload}` and decodes the payload.
pub fn decode_data_uri(uri: &str) -> Option<(String, Vec<u8>)> {
    let rest = uri.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let mime = meta.strip_suffix(";base64")?;
    let bytes = STANDARD.decode(payload.trim()).ok()?;
    Some((mime.to_string(), bytes))
}

pub fn extension_for_mime(mime: &str) -> &'static str {
    match mime.to_ascii_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/png" => "png",
        _ => "bin",
    }
}

fn file_stem(id: &str) -> String {
    id.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

/// Writes every successful `data:` result to `{dir}/{task id}.{ext}`.
/// Remote URLs are left alone.
pub async fn save_images(dir: &Path, tasks: &[BatchTask]) -> Result<Vec<PathBuf>, CliError> {
    tokio::fs::create_dir_all(dir).await?;
    let mut written = Vec::new();
    for task in tasks {
        let Some(url) = task.image_url() else {
            continue;
        };
        let Some((mime, bytes)) = decode_data_uri(url) else {
            tracing::debug!(task_id = task.id(), "result is not an inline image, skipped");
            continue;
        };
        let path = dir.join(format!("{}.{}", file_stem(task.id()), extension_for_mime(&mime)));
        tokio::fs::write(&path, bytes).await?;
        written.push(path);
    }
    Ok(written)
}
