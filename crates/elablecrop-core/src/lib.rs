pub mod config;
pub mod controller;
pub mod error;
pub mod extract;
pub mod geometry;
pub mod presenter;
pub mod render;
pub mod surface;

use error::CropError;
use geometry::{CropRect, MAGNIFICATION};
use render::DocumentRenderer;
use surface::Surface;

/// One-shot API: render page 1 of a PDF at the fixed magnification and cut
/// `rect` (document units) out of it.
pub fn crop_pdf(
    pdf_bytes: &[u8],
    renderer: &dyn DocumentRenderer,
    rect: &CropRect,
) -> Result<Surface, CropError> {
    let page = renderer.render_first_page(pdf_bytes, MAGNIFICATION)?;
    Ok(extract::extract_region(&page, rect, MAGNIFICATION))
}
