// src/services/upload_store.rs
use crate::errors::ApiError;
use std::path::{Path, PathBuf};

/// Flat directory of uploaded images, keyed by sanitized filename. Files are
/// never deleted; identical filenames overwrite, last writer wins.
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn save(&self, filename: &str, data: &[u8]) -> Result<PathBuf, ApiError> {
        let path = self.dir.join(filename);
        tokio::fs::write(&path, data)
            .await
            .map_err(|e| ApiError::Storage(format!("failed to write {}: {e}", path.display())))?;
        Ok(path)
    }
}

/// Reduces a client-supplied filename to a safe flat name: path components
/// are stripped, whitespace becomes underscores, anything outside
/// `[A-Za-z0-9._-]` is dropped, and leading dots are removed. Returns `None`
/// when nothing usable remains.
pub fn sanitize_filename(raw: &str) -> Option<String> {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);

    let cleaned: String = base
        .chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                Some(c)
            } else if c.is_whitespace() {
                Some('_')
            } else {
                None
            }
        })
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}
