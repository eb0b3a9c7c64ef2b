pub mod auto;
pub mod check;
pub mod manual;
pub mod session;

use elablecrop_core::config::{self, CropConfig};
use elablecrop_core::error::CropError;
use std::path::{Path, PathBuf};

/// Load the config file if one was given, then apply command-line overrides.
pub fn load_config(path: Option<&Path>, out_dir: Option<PathBuf>) -> Result<CropConfig, CropError> {
    let mut config = match path {
        Some(path) => config::load_config(path)?,
        None => CropConfig::default(),
    };
    if let Some(dir) = out_dir {
        config.output_dir = dir;
    }
    config::validate_config(&config)?;
    log::debug!("using config {:?}", config);
    Ok(config)
}
