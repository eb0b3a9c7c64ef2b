use elablecrop_core::config::CropConfig;
use elablecrop_core::controller::{CropController, ManualField, SelectedFile};
use elablecrop_core::error::CropError;
use std::path::PathBuf;

use crate::output::{self, OutputFormat};

pub fn run(
    config: &CropConfig,
    input_file: PathBuf,
    fields: [String; 4],
    save: bool,
    output_format: OutputFormat,
) -> Result<(), CropError> {
    let mut controller = CropController::with_config(config.renderer(), config);
    controller.choose_file(SelectedFile::from_path(&input_file)?);

    let [tlx, tly, brx, bry] = fields;
    controller.set_manual_field(ManualField::TopLeftX, tlx);
    controller.set_manual_field(ManualField::TopLeftY, tly);
    controller.set_manual_field(ManualField::BottomRightX, brx);
    controller.set_manual_field(ManualField::BottomRightY, bry);

    let presented = controller.manual_crop()?;
    let saved = if save { controller.download()? } else { None };

    match output_format {
        OutputFormat::Json => output::json::print(&serde_json::json!({
            "result": presented,
            "saved": saved,
        }))?,
        OutputFormat::Text => {
            println!("{}", output::text::format_presented(&presented));
            if let Some(path) = saved {
                println!("Saved {}", path.display());
            }
        }
    }

    Ok(())
}
