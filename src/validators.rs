//! Upload validation
//!
//! Every upload is checked before anything touches disk: declared MIME
//! type against the allowed set, byte size against the configured limit,
//! and magic bytes against the container format the allowed documents
//! actually use. Declared types alone are client-controlled and cheap to
//! forge; the magic check catches renamed files.

use thiserror::Error;

/// Upload rejection reasons
#[derive(Debug, Error)]
pub enum ValidationError {
    /// Declared content type missing from the multipart field
    #[error("Missing content type")]
    MissingContentType,

    /// Declared content type not in the allowed set
    #[error("Unsupported content type: {0}")]
    UnsupportedType(String),

    /// File exceeds the configured size limit
    #[error("File too large: {size} bytes (limit {limit})")]
    TooLarge { size: u64, limit: u64 },

    /// File content does not look like an Office document
    #[error("File content is not a valid document")]
    BadMagic,
}

/// Validation policy applied to every upload
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    max_bytes: u64,
    allowed_types: Vec<String>,
}

impl UploadPolicy {
    pub fn new(max_bytes: u64, allowed_types: Vec<String>) -> Self {
        Self {
            max_bytes,
            allowed_types,
        }
    }

    pub fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// Check one upload against the policy.
    ///
    /// Runs the cheap checks first (declared type, size), then verifies
    /// magic bytes.
    pub fn check(&self, content_type: Option<&str>, data: &[u8]) -> Result<(), ValidationError> {
        let declared = content_type.ok_or(ValidationError::MissingContentType)?;

        if !self.allowed_types.iter().any(|t| t == declared) {
            return Err(ValidationError::UnsupportedType(declared.to_string()));
        }

        let size = data.len() as u64;
        if size > self.max_bytes {
            return Err(ValidationError::TooLarge {
                size,
                limit: self.max_bytes,
            });
        }

        if !has_zip_magic(data) {
            return Err(ValidationError::BadMagic);
        }

        Ok(())
    }
}

/// Verify the ZIP local-file-header magic that OOXML documents (.docx,
/// .pptx, .xlsx) start with.
fn has_zip_magic(data: &[u8]) -> bool {
    matches!(
        data,
        [0x50, 0x4B, 0x03, 0x04, ..] | [0x50, 0x4B, 0x05, 0x06, ..] | [0x50, 0x4B, 0x07, 0x08, ..]
    )
}
