use elablecrop_core::config::CropConfig;
use elablecrop_core::controller::{CropController, SelectedFile};
use elablecrop_core::error::CropError;
use std::path::PathBuf;

use crate::output::{self, OutputFormat};

pub fn run(config: &CropConfig, input_file: PathBuf, output_format: OutputFormat) -> Result<(), CropError> {
    let mut controller = CropController::with_config(config.renderer(), config);
    controller.choose_file(SelectedFile::from_path(&input_file)?);

    let presented = controller.auto_crop()?;

    match output_format {
        OutputFormat::Json => output::json::print(&presented)?,
        OutputFormat::Text => println!("{}", output::text::format_presented(&presented)),
    }

    Ok(())
}
