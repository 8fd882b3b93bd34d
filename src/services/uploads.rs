//! Cover image uploads

use std::path::{Path, PathBuf};

use chrono::Utc;
use rand::Rng;

use crate::{
    config::UploadsConfig,
    error::{AppError, AppResult},
};

/// URL prefix under which the uploads directory is served
pub const UPLOADS_URL_PREFIX: &str = "/uploads";

const ALLOWED_EXTENSIONS: [&str; 3] = ["jpeg", "jpg", "png"];
const ALLOWED_CONTENT_TYPES: [&str; 3] = ["image/jpeg", "image/jpg", "image/png"];

#[derive(Clone)]
pub struct UploadService {
    dir: PathBuf,
    max_file_size: usize,
}

impl UploadService {
    pub fn new(config: &UploadsConfig) -> Self {
        Self {
            dir: config.dir.clone(),
            max_file_size: config.max_file_size,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    /// Create the uploads directory if needed
    pub async fn ensure_dir(&self) -> AppResult<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Validate and write a cover image, returning its public URL
    pub async fn store_cover(
        &self,
        original_name: &str,
        content_type: Option<&str>,
        data: &[u8],
    ) -> AppResult<String> {
        let extension = accepted_extension(original_name, content_type)?;
        if data.len() > self.max_file_size {
            return Err(AppError::UploadRejected("File too large".to_string()));
        }

        let file_name = format!(
            "book-cover-{}-{}.{}",
            Utc::now().timestamp_millis(),
            rand::thread_rng().gen_range(0..1_000_000_000u32),
            extension
        );
        tokio::fs::write(self.dir.join(&file_name), data).await?;
        tracing::info!("Stored cover {} ({} bytes)", file_name, data.len());

        Ok(format!("{}/{}", UPLOADS_URL_PREFIX, file_name))
    }
}

/// Both the extension and the declared content type must name a JPEG or PNG
fn accepted_extension(original_name: &str, content_type: Option<&str>) -> AppResult<String> {
    let rejected = || AppError::UploadRejected("Only JPEG, JPG, and PNG files are allowed".to_string());

    let extension = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .filter(|e| ALLOWED_EXTENSIONS.contains(&e.as_str()))
        .ok_or_else(rejected)?;

    let content_type = content_type.map(|c| c.to_ascii_lowercase()).ok_or_else(rejected)?;
    if !ALLOWED_CONTENT_TYPES.contains(&content_type.as_str()) {
        return Err(rejected());
    }

    Ok(extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(dir: &Path, max_file_size: usize) -> UploadService {
        UploadService::new(&UploadsConfig {
            dir: dir.to_path_buf(),
            max_file_size,
        })
    }

    #[test]
    fn test_accepted_extension() {
        assert_eq!(accepted_extension("cover.PNG", Some("image/png")).unwrap(), "png");
        assert_eq!(accepted_extension("a.b.jpeg", Some("image/jpeg")).unwrap(), "jpeg");
        assert!(accepted_extension("cover.gif", Some("image/gif")).is_err());
        assert!(accepted_extension("cover.png", Some("text/plain")).is_err());
        assert!(accepted_extension("cover.png", None).is_err());
        assert!(accepted_extension("cover", Some("image/png")).is_err());
    }

    #[tokio::test]
    async fn test_store_cover_writes_file() {
        let tmp = tempfile::tempdir().unwrap();
        let uploads = service(tmp.path(), 1024);

        let url = uploads
            .store_cover("dune.jpg", Some("image/jpeg"), b"not really a jpeg")
            .await
            .unwrap();

        assert!(url.starts_with("/uploads/book-cover-"));
        assert!(url.ends_with(".jpg"));
        let name = url.trim_start_matches("/uploads/");
        let written = std::fs::read(tmp.path().join(name)).unwrap();
        assert_eq!(written, b"not really a jpeg");
    }

    #[tokio::test]
    async fn test_store_cover_rejects_large_files() {
        let tmp = tempfile::tempdir().unwrap();
        let uploads = service(tmp.path(), 4);

        let err = uploads
            .store_cover("dune.png", Some("image/png"), b"12345")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::UploadRejected(ref m) if m == "File too large"));
    }
}
