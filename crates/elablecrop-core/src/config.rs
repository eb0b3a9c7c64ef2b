use crate::error::CropError;
use crate::render::poppler::PopplerRenderer;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_FILE_PREFIX: &str = "elablecrop-FK";

/// Runtime settings. Every field has a default, so an empty JSON object is a
/// valid config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CropConfig {
    /// Directory downloads are written to.
    pub output_dir: PathBuf,
    /// File name prefix for downloads, before the timestamp.
    pub file_prefix: String,
    /// pdftoppm executable name or path.
    pub pdftoppm: String,
    /// pdfinfo executable name or path.
    pub pdfinfo: String,
}

impl Default for CropConfig {
    fn default() -> Self {
        CropConfig {
            output_dir: PathBuf::from("."),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            pdftoppm: "pdftoppm".to_string(),
            pdfinfo: "pdfinfo".to_string(),
        }
    }
}

impl CropConfig {
    pub fn renderer(&self) -> PopplerRenderer {
        PopplerRenderer::with_tools(&self.pdftoppm, &self.pdfinfo)
    }
}

/// Load a config from a JSON file.
pub fn load_config(path: &Path) -> Result<CropConfig, CropError> {
    let content = std::fs::read_to_string(path).map_err(|e| CropError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let config: CropConfig =
        serde_json::from_str(&content).map_err(|e| CropError::ConfigLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_config(&config)?;
    Ok(config)
}

/// Parse a config from a JSON string (no file path context).
pub fn parse_config_str(json: &str) -> Result<CropConfig, CropError> {
    let config: CropConfig = serde_json::from_str(json)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validate that a config is usable.
pub fn validate_config(config: &CropConfig) -> Result<(), CropError> {
    if config.file_prefix.is_empty() {
        return Err(CropError::ConfigInvalid(
            "file_prefix must not be empty".into(),
        ));
    }

    if config.file_prefix.contains(['/', '\\']) {
        return Err(CropError::ConfigInvalid(format!(
            "file_prefix '{}' must not contain path separators",
            config.file_prefix
        )));
    }

    if config.pdftoppm.is_empty() || config.pdfinfo.is_empty() {
        return Err(CropError::ConfigInvalid(
            "pdftoppm and pdfinfo must not be empty".into(),
        ));
    }

    if config.output_dir.as_os_str().is_empty() {
        return Err(CropError::ConfigInvalid(
            "output_dir must not be empty".into(),
        ));
    }

    Ok(())
}
