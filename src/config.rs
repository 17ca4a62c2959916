//! Configuration loading for slidegate
//!
//! Settings are resolved with the following priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! CLI and environment tiers are handled by clap in `main`; this module
//! owns the TOML tier and the defaults.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// MIME type of Word documents (.docx), the only type accepted by default
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Default upload size limit: 10 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Gateway settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Listen host
    pub host: String,
    /// Listen port
    pub port: u16,
    /// Parent directory for `uploads/` and `converted/`
    pub data_dir: PathBuf,
    /// Upload validation settings
    pub upload: UploadSettings,
    /// External converter settings
    pub converter: ConverterSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            data_dir: PathBuf::from("./data"),
            upload: UploadSettings::default(),
            converter: ConverterSettings::default(),
        }
    }
}

/// Upload validation settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    /// Maximum accepted file size in bytes
    pub max_bytes: u64,
    /// Accepted declared MIME types
    pub allowed_types: Vec<String>,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            allowed_types: vec![DOCX_MIME.to_string()],
        }
    }
}

/// External converter settings
///
/// The converter is invoked as `<command> [args...] <input> <output>` with
/// absolute input and output paths appended as the final two arguments.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConverterSettings {
    /// Command to execute
    pub command: String,
    /// Fixed arguments placed before the input/output paths
    pub args: Vec<String>,
    /// Deadline for a single conversion, in seconds
    pub timeout_secs: u64,
    /// Extension given to converted artifacts
    pub target_extension: String,
}

impl Default for ConverterSettings {
    fn default() -> Self {
        Self {
            command: "python3".to_string(),
            args: vec!["convert.py".to_string()],
            timeout_secs: 120,
            target_extension: "pptx".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file, falling back to defaults when no
    /// file is given or the default locations hold none.
    ///
    /// An explicitly requested file that cannot be read or parsed is a
    /// hard error; missing default-location files are not.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let path = match explicit_path {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_file(),
        };

        match path {
            Some(path) if explicit_path.is_some() || path.exists() => {
                let content = std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                let settings = toml::from_str(&content)
                    .with_context(|| format!("failed to parse config file {}", path.display()))?;
                info!("Configuration loaded from {}", path.display());
                Ok(settings)
            }
            _ => Ok(Self::default()),
        }
    }
}

/// Locate a config file in the default locations.
///
/// Checks `./slidegate.toml` first, then the per-user config directory
/// (e.g. `~/.config/slidegate/config.toml` on Linux).
fn default_config_file() -> Option<PathBuf> {
    let cwd_config = PathBuf::from("slidegate.toml");
    if cwd_config.exists() {
        return Some(cwd_config);
    }

    let user_config = dirs::config_dir().map(|d| d.join("slidegate").join("config.toml"));
    match user_config {
        Some(path) if path.exists() => Some(path),
        _ => None,
    }
}
