use elablecrop_core::config::CropConfig;
use elablecrop_core::error::CropError;
use elablecrop_core::render::DocumentRenderer;

pub fn run(config: &CropConfig) -> Result<(), CropError> {
    let renderer = config.renderer();
    if !renderer.is_available() {
        return Err(CropError::ToolNotFound {
            tool: format!("{} / {}", config.pdftoppm, config.pdfinfo),
        });
    }
    println!(
        "Renderer '{}' is available ({}, {}).",
        renderer.backend_name(),
        config.pdftoppm,
        config.pdfinfo
    );
    println!("Output directory: {}", config.output_dir.display());
    Ok(())
}
