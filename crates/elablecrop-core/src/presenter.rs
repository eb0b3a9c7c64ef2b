use crate::config::DEFAULT_FILE_PREFIX;
use crate::error::CropError;
use crate::surface::Surface;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// How a freshly cropped surface is handed to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Write the PNG immediately.
    Download,
    /// Keep the surface on screen and reveal the download control.
    Display,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Presented {
    Downloaded {
        path: PathBuf,
        width: u32,
        height: u32,
    },
    Displayed {
        width: u32,
        height: u32,
    },
}

/// Owns the single "last produced surface" and the download control.
#[derive(Debug)]
pub struct Presenter {
    output_dir: PathBuf,
    file_prefix: String,
    last: Option<Surface>,
    download_visible: bool,
}

impl Presenter {
    pub fn new(output_dir: impl Into<PathBuf>, file_prefix: impl Into<String>) -> Self {
        Presenter {
            output_dir: output_dir.into(),
            file_prefix: file_prefix.into(),
            last: None,
            download_visible: false,
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn last_surface(&self) -> Option<&Surface> {
        self.last.as_ref()
    }

    pub fn download_visible(&self) -> bool {
        self.download_visible
    }

    /// Forget the last surface and hide the download control.
    pub fn clear(&mut self) {
        self.last = None;
        self.download_visible = false;
    }

    /// Take ownership of a new result, replacing any previous one.
    pub fn present(&mut self, surface: Surface, mode: OutputMode) -> Result<Presented, CropError> {
        let (width, height) = (surface.width(), surface.height());

        match mode {
            OutputMode::Download => {
                let written = self.write(&surface, Utc::now());
                self.last = Some(surface);
                let path = written?;
                Ok(Presented::Downloaded {
                    path,
                    width,
                    height,
                })
            }
            OutputMode::Display => {
                self.last = Some(surface);
                self.download_visible = true;
                Ok(Presented::Displayed { width, height })
            }
        }
    }

    /// The manual download control. Does nothing when no crop has been
    /// produced yet.
    pub fn download(&self) -> Result<Option<PathBuf>, CropError> {
        match self.last.as_ref() {
            Some(surface) => self.write(surface, Utc::now()).map(Some),
            None => {
                log::debug!("download requested with no cropped surface");
                Ok(None)
            }
        }
    }

    /// Never overwrites: a name already taken gets a ` (n)` suffix.
    fn write(&self, surface: &Surface, at: DateTime<Utc>) -> Result<PathBuf, CropError> {
        let png_bytes = surface.encode_png()?;
        let name = download_file_name(&self.file_prefix, at);
        let stem = name.trim_end_matches(".png");

        let mut attempt = 0u32;
        let (path, mut file) = loop {
            let path = if attempt == 0 {
                self.output_dir.join(&name)
            } else {
                self.output_dir.join(format!("{} ({}).png", stem, attempt))
            };
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => break (path, file),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(e.into()),
            }
        };
        file.write_all(&png_bytes)?;
        log::info!(
            "wrote {}x{} crop to {}",
            surface.width(),
            surface.height(),
            path.display()
        );
        Ok(path)
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Presenter::new(".", DEFAULT_FILE_PREFIX)
    }
}

/// `<prefix>-<ISO-8601 instant with ':' and '.' replaced by '-'>.png`,
/// e.g. `elablecrop-FK-2024-05-01T09-30-12-045Z.png`.
pub fn download_file_name(prefix: &str, at: DateTime<Utc>) -> String {
    format!("{}-{}.png", prefix, at.format("%Y-%m-%dT%H-%M-%S-%3fZ"))
}
