pub mod poppler;

use crate::error::CropError;
use crate::surface::Surface;

/// Trait for PDF rasterization backends.
pub trait DocumentRenderer: Send + Sync {
    /// Load a document from bytes and rasterize page 1 at `scale` times its
    /// native size (1.0 = 72 dpi).
    fn render_first_page(&self, pdf_bytes: &[u8], scale: f64) -> Result<Surface, CropError>;

    /// Name of this rendering backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
