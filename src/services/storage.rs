//! Upload storage
//!
//! Owns the `uploads/` and `converted/` directories: creates them at
//! startup, persists incoming files under collision-resistant names, and
//! derives output paths for the converter.
//!
//! Storage names carry a per-upload random token instead of a timestamp
//! prefix, so concurrent uploads of identically named files cannot
//! collide regardless of clock resolution.

use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

/// Fallback name for uploads whose filename sanitizes to nothing
const FALLBACK_NAME: &str = "upload";

/// A file persisted under `uploads/`
#[derive(Debug, Clone)]
pub struct StoredUpload {
    /// Filename as supplied by the client
    pub original_name: String,
    /// Unique name the file is stored under
    pub storage_name: String,
    /// Absolute path of the stored file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
}

/// Manages the upload and output directories
#[derive(Debug, Clone)]
pub struct UploadStore {
    uploads_dir: PathBuf,
    converted_dir: PathBuf,
}

impl UploadStore {
    /// Create the store rooted at `data_dir`, creating `uploads/` and
    /// `converted/` if absent. Both paths are canonicalized so the
    /// converter always receives absolute paths.
    pub fn new(data_dir: &Path) -> io::Result<Self> {
        let uploads_dir = data_dir.join("uploads");
        let converted_dir = data_dir.join("converted");

        std::fs::create_dir_all(&uploads_dir)?;
        std::fs::create_dir_all(&converted_dir)?;

        Ok(Self {
            uploads_dir: uploads_dir.canonicalize()?,
            converted_dir: converted_dir.canonicalize()?,
        })
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    pub fn converted_dir(&self) -> &Path {
        &self.converted_dir
    }

    /// Write upload bytes under a fresh storage name.
    pub async fn persist(&self, original_name: &str, data: &[u8]) -> io::Result<StoredUpload> {
        let storage_name = storage_name(original_name);
        let path = self.uploads_dir.join(&storage_name);

        tokio::fs::write(&path, data).await?;

        debug!(
            original = original_name,
            stored = %path.display(),
            size = data.len(),
            "Upload persisted"
        );

        Ok(StoredUpload {
            original_name: original_name.to_string(),
            storage_name,
            path,
            size: data.len() as u64,
        })
    }

    /// Output filename and absolute path for a stored upload, with the
    /// extension replaced by the target format's.
    pub fn output_for(&self, stored: &StoredUpload, target_extension: &str) -> (String, PathBuf) {
        let output_name = replace_extension(&stored.storage_name, target_extension);
        let output_path = self.converted_dir.join(&output_name);
        (output_name, output_path)
    }
}

/// Build a unique storage name: `<random-token>-<sanitized-original>`.
fn storage_name(original_name: &str) -> String {
    format!(
        "{}-{}",
        Uuid::new_v4().simple(),
        sanitize_file_name(original_name)
    )
}

/// Reduce a client-supplied filename to a safe final path component.
///
/// Strips any directory components, then replaces characters outside
/// `[A-Za-z0-9._-]` with `_`. Empty results fall back to a fixed name.
fn sanitize_file_name(raw: &str) -> String {
    let base = Path::new(raw)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let safe: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = safe.trim_matches('.');
    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Replace (or append) a filename's extension.
fn replace_extension(name: &str, extension: &str) -> String {
    let mut path = PathBuf::from(name);
    path.set_extension(extension);
    path.to_string_lossy().into_owned()
}
