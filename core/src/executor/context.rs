use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::BatchError;
use crate::service::SharedContext;

/// Where the run's reference image comes from.
#[derive(Debug, Clone)]
pub enum ReferenceImage {
    File(PathBuf),
    Bytes { data: Vec<u8>, mime_type: String },
}

impl ReferenceImage {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    pub fn from_bytes(data: Vec<u8>, mime_type: impl Into<String>) -> Self {
        Self::Bytes {
            data,
            mime_type: mime_type.into(),
        }
    }

    /// Reads and base64-encodes the image. Called once per run, before any
    /// request is issued.
    pub async fn resolve(&self) -> Result<SharedContext, BatchError> {
        match self {
            Self::File(path) => {
                let data = tokio::fs::read(path).await.map_err(|e| {
                    BatchError::SharedContext(format!("read {}: {e}", path.display()))
                })?;
                encode(&data, guess_mime(path))
            }
            Self::Bytes { data, mime_type } => encode(data, mime_type),
        }
    }
}

fn encode(data: &[u8], mime_type: &str) -> Result<SharedContext, BatchError> {
    if data.is_empty() {
        return Err(BatchError::SharedContext("reference image is empty".into()));
    }
    if mime_type.trim().is_empty() {
        return Err(BatchError::SharedContext("missing mime type".into()));
    }
    Ok(SharedContext::new(STANDARD.encode(data), mime_type.trim()))
}

pub fn guess_mime(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn guesses_mime_from_extension() {
        assert_eq!(guess_mime(Path::new("a/b.PNG")), "image/png");
        assert_eq!(guess_mime(Path::new("photo.jpeg")), "image/jpeg");
        assert_eq!(guess_mime(Path::new("x.webp")), "image/webp");
        assert_eq!(guess_mime(Path::new("noext")), "application/octet-stream");
    }

    #[tokio::test]
    async fn resolves_file_to_base64() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(b"hello").unwrap();

        let ctx = ReferenceImage::from_path(file.path()).resolve().await.unwrap();
        assert_eq!(ctx.mime_type, "image/png");
        assert_eq!(ctx.data_base64, "aGVsbG8=");
    }

    #[tokio::test]
    async fn missing_file_is_a_shared_context_error() {
        let err = ReferenceImage::from_path("/definitely/not/here.png")
            .resolve()
            .await
            .unwrap_err();
        assert!(matches!(err, BatchError::SharedContext(_)));
    }

    #[tokio::test]
    async fn empty_bytes_are_rejected() {
        let err = ReferenceImage::from_bytes(Vec::new(), "image/png")
            .resolve()
            .await
            .unwrap_err();
        assert!(matches!(err, BatchError::SharedContext(_)));
    }
}
