use crate::config::CropConfig;
use crate::error::CropError;
use crate::geometry::{CropRect, AUTO_CROP};
use crate::presenter::{OutputMode, Presented, Presenter};
use crate::render::DocumentRenderer;
use crate::surface::Surface;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const PDF_MEDIA_TYPE: &str = "application/pdf";
const UNKNOWN_MEDIA_TYPE: &str = "application/octet-stream";

/// A document picked by the user. Replaced wholesale, never mutated.
#[derive(Debug, Clone)]
pub struct SelectedFile {
    name: String,
    media_type: String,
    data: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, data: Vec<u8>) -> Self {
        SelectedFile {
            name: name.into(),
            media_type: media_type.into(),
            data,
        }
    }

    /// Read a file from disk. The declared media type comes from the
    /// extension, the way a browser fills in `File.type`.
    pub fn from_path(path: &Path) -> Result<Self, CropError> {
        let data = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(SelectedFile {
            media_type: declared_media_type(path).to_string(),
            name,
            data,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

fn declared_media_type(path: &Path) -> &'static str {
    let is_pdf = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("pdf"))
        .unwrap_or(false);
    if is_pdf {
        PDF_MEDIA_TYPE
    } else {
        UNKNOWN_MEDIA_TYPE
    }
}

/// One of the four manual coordinate inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualField {
    TopLeftX,
    TopLeftY,
    BottomRightX,
    BottomRightY,
}

impl FromStr for ManualField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tlx" => Ok(ManualField::TopLeftX),
            "tly" => Ok(ManualField::TopLeftY),
            "brx" => Ok(ManualField::BottomRightX),
            "bry" => Ok(ManualField::BottomRightY),
            other => Err(format!(
                "unknown field '{}' (expected tlx, tly, brx or bry)",
                other
            )),
        }
    }
}

impl fmt::Display for ManualField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManualField::TopLeftX => write!(f, "tlx"),
            ManualField::TopLeftY => write!(f, "tly"),
            ManualField::BottomRightX => write!(f, "brx"),
            ManualField::BottomRightY => write!(f, "bry"),
        }
    }
}

/// Raw text of the manual inputs. Parsed only when the manual trigger fires.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ManualFields {
    pub tlx: String,
    pub tly: String,
    pub brx: String,
    pub bry: String,
}

impl ManualFields {
    pub fn set(&mut self, field: ManualField, text: impl Into<String>) {
        let slot = match field {
            ManualField::TopLeftX => &mut self.tlx,
            ManualField::TopLeftY => &mut self.tly,
            ManualField::BottomRightX => &mut self.brx,
            ManualField::BottomRightY => &mut self.bry,
        };
        *slot = text.into();
    }

    pub fn to_rect(&self) -> CropRect {
        CropRect::from_fields(&self.tlx, &self.tly, &self.brx, &self.bry)
    }
}

/// Snapshot of the controller for status output.
#[derive(Debug, Clone, Serialize)]
pub struct ControllerStatus {
    pub selected: Option<String>,
    pub manual_fields_visible: bool,
    pub manual_fields: ManualFields,
    pub last_result: Option<(u32, u32)>,
    pub download_visible: bool,
    pub output_dir: PathBuf,
}

/// Owns the selected file, the manual inputs and the presenter.
///
/// Triggers take `&mut self`, so at most one crop runs at a time and the last
/// produced surface always belongs to the most recently started trigger.
pub struct CropController<R: DocumentRenderer> {
    renderer: R,
    selected: Option<SelectedFile>,
    manual: ManualFields,
    manual_visible: bool,
    presenter: Presenter,
}

impl<R: DocumentRenderer> CropController<R> {
    pub fn new(renderer: R, presenter: Presenter) -> Self {
        CropController {
            renderer,
            selected: None,
            manual: ManualFields::default(),
            manual_visible: false,
            presenter,
        }
    }

    pub fn with_config(renderer: R, config: &CropConfig) -> Self {
        Self::new(
            renderer,
            Presenter::new(&config.output_dir, &config.file_prefix),
        )
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Chooser path: any file is accepted.
    pub fn choose_file(&mut self, file: SelectedFile) {
        log::info!("selected {} ({} bytes)", file.name(), file.data().len());
        self.selected = Some(file);
        self.presenter.clear();
    }

    /// Drop path: only files declared as PDF are accepted. Anything else
    /// leaves the current selection and result untouched.
    pub fn drop_file(&mut self, file: SelectedFile) -> Result<(), CropError> {
        if file.media_type() != PDF_MEDIA_TYPE {
            log::debug!("rejected drop of '{}' ({})", file.name(), file.media_type());
            return Err(CropError::NotAPdf {
                name: file.name().to_string(),
                media_type: file.media_type().to_string(),
            });
        }
        self.choose_file(file);
        Ok(())
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.selected.as_ref().map(SelectedFile::name)
    }

    /// Show or hide the manual inputs. Returns the new visibility.
    pub fn toggle_manual_fields(&mut self) -> bool {
        self.manual_visible = !self.manual_visible;
        self.manual_visible
    }

    pub fn manual_fields_visible(&self) -> bool {
        self.manual_visible
    }

    pub fn set_manual_field(&mut self, field: ManualField, text: impl Into<String>) {
        self.manual.set(field, text);
    }

    pub fn manual_fields(&self) -> &ManualFields {
        &self.manual
    }

    /// Crop the fixed preset rectangle and download it immediately.
    pub fn auto_crop(&mut self) -> Result<Presented, CropError> {
        self.run(&AUTO_CROP, OutputMode::Download)
    }

    /// Crop the manually entered rectangle and display it.
    pub fn manual_crop(&mut self) -> Result<Presented, CropError> {
        let rect = self.manual.to_rect();
        self.run(&rect, OutputMode::Display)
    }

    /// The download control: writes the last result, or does nothing.
    pub fn download(&self) -> Result<Option<PathBuf>, CropError> {
        self.presenter.download()
    }

    pub fn last_surface(&self) -> Option<&Surface> {
        self.presenter.last_surface()
    }

    pub fn download_visible(&self) -> bool {
        self.presenter.download_visible()
    }

    pub fn status(&self) -> ControllerStatus {
        ControllerStatus {
            selected: self.selected_name().map(str::to_string),
            manual_fields_visible: self.manual_visible,
            manual_fields: self.manual.clone(),
            last_result: self.last_surface().map(|s| (s.width(), s.height())),
            download_visible: self.download_visible(),
            output_dir: self.presenter.output_dir().to_path_buf(),
        }
    }

    fn run(&mut self, rect: &CropRect, mode: OutputMode) -> Result<Presented, CropError> {
        let Some(file) = self.selected.as_ref() else {
            return Err(CropError::NoFileSelected);
        };

        self.presenter.clear();
        log::info!(
            "cropping {} with {} at ({}, {})-({}, {}) via {}",
            file.name(),
            match mode {
                OutputMode::Download => "auto download",
                OutputMode::Display => "display",
            },
            rect.tlx,
            rect.tly,
            rect.brx,
            rect.bry,
            self.renderer.backend_name()
        );

        let cropped = crate::crop_pdf(file.data(), &self.renderer, rect)?;
        self.presenter.present(cropped, mode)
    }
}
