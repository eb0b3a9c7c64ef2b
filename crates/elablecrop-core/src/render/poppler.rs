use crate::error::CropError;
use crate::render::DocumentRenderer;
use crate::surface::Surface;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output};

/// Points per inch; poppler's resolution for a 1x render.
const BASE_DPI: f64 = 72.0;

/// Rendering backend using pdfinfo and pdftoppm (from poppler-utils).
///
/// Loading runs `pdfinfo` so a corrupt document fails before any rendering
/// starts; page 1 is then rasterized with `pdftoppm -png -singlefile`.
pub struct PopplerRenderer {
    pdftoppm: String,
    pdfinfo: String,
}

/// What `pdfinfo` reports about a loaded document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentInfo {
    pub pages: usize,
    /// Size of page 1 in points, when reported.
    pub page_size: Option<(f64, f64)>,
}

impl PopplerRenderer {
    pub fn new() -> Self {
        Self::with_tools("pdftoppm", "pdfinfo")
    }

    pub fn with_tools(pdftoppm: impl Into<String>, pdfinfo: impl Into<String>) -> Self {
        PopplerRenderer {
            pdftoppm: pdftoppm.into(),
            pdfinfo: pdfinfo.into(),
        }
    }

    /// Check if both poppler tools are available on the system.
    pub fn is_available(&self) -> bool {
        [&self.pdftoppm, &self.pdfinfo].iter().all(|tool| {
            Command::new(tool.as_str())
                .arg("-v")
                .output()
                .map(|o| o.status.success() || !o.stderr.is_empty())
                .unwrap_or(false)
        })
    }

    /// Load step: validate the document and read its page count.
    pub fn load(&self, pdf_path: &Path) -> Result<DocumentInfo, CropError> {
        let output = run_tool(Command::new(&self.pdfinfo).arg(pdf_path), &self.pdfinfo)?;
        let info = parse_pdfinfo(&String::from_utf8_lossy(&output.stdout));
        if info.pages == 0 {
            return Err(CropError::RenderFailed("document has no pages".into()));
        }
        log::debug!(
            "loaded document: {} page(s), page 1 size {:?}",
            info.pages,
            info.page_size
        );
        Ok(info)
    }

    /// Render step: rasterize page 1 of an already loaded document.
    pub fn render_page_one(&self, pdf_path: &Path, scale: f64) -> Result<Surface, CropError> {
        let out_dir = tempfile::tempdir()?;
        let out_prefix = out_dir.path().join("page");

        run_tool(
            Command::new(&self.pdftoppm)
                .arg("-png")
                .args(["-f", "1", "-l", "1"])
                .arg("-r")
                .arg(format_resolution(scale))
                .arg("-singlefile")
                .arg(pdf_path)
                .arg(&out_prefix),
            &self.pdftoppm,
        )?;

        let png_path = out_prefix.with_extension("png");
        let bytes = std::fs::read(&png_path).map_err(|e| {
            CropError::RenderFailed(format!(
                "{} produced no image at {}: {}",
                self.pdftoppm,
                png_path.display(),
                e
            ))
        })?;
        let surface = Surface::decode(&bytes)?;
        log::debug!("rendered page 1 at {}x{}", surface.width(), surface.height());
        Ok(surface)
    }
}

impl Default for PopplerRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentRenderer for PopplerRenderer {
    fn render_first_page(&self, pdf_bytes: &[u8], scale: f64) -> Result<Surface, CropError> {
        // Write PDF bytes to a temp file
        let mut tmpfile = tempfile::Builder::new().suffix(".pdf").tempfile()?;
        tmpfile.write_all(pdf_bytes)?;
        tmpfile.flush()?;

        self.load(tmpfile.path())?;
        self.render_page_one(tmpfile.path(), scale)
    }

    fn backend_name(&self) -> &str {
        "poppler"
    }
}

fn run_tool(command: &mut Command, tool: &str) -> Result<Output, CropError> {
    let output = command.output().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            CropError::ToolNotFound {
                tool: tool.to_string(),
            }
        } else {
            CropError::RenderFailed(format!("{} failed: {}", tool, e))
        }
    })?;

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(CropError::ToolFailed {
            tool: tool.to_string(),
            code,
            stderr,
        });
    }

    Ok(output)
}

/// pdftoppm takes a resolution in dpi; 1.5x is 108 dpi.
fn format_resolution(scale: f64) -> String {
    let dpi = BASE_DPI * scale;
    if dpi.fract() == 0.0 {
        format!("{}", dpi as u64)
    } else {
        format!("{:.3}", dpi)
    }
}

fn parse_pdfinfo(text: &str) -> DocumentInfo {
    let mut pages = 0;
    let mut page_size = None;

    for line in text.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        match key.trim() {
            "Pages" => pages = value.trim().parse().unwrap_or(0),
            "Page size" => page_size = parse_page_size(value),
            _ => {}
        }
    }

    DocumentInfo { pages, page_size }
}

/// `612 x 792 pts (letter)` -> (612.0, 792.0)
fn parse_page_size(value: &str) -> Option<(f64, f64)> {
    let mut parts = value.split_whitespace();
    let width = parts.next()?.parse().ok()?;
    if parts.next()? != "x" {
        return None;
    }
    let height = parts.next()?.parse().ok()?;
    Some((width, height))
}
