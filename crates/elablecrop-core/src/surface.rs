//! In-memory pixel grids: the rendered page and the cropped result.

use crate::error::CropError;
use image::RgbaImage;
use std::io;

/// An RGBA8 pixel grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    rgba: RgbaImage,
}

impl Surface {
    pub fn from_rgba(rgba: RgbaImage) -> Self {
        Surface { rgba }
    }

    /// Decode a PNG (or any format `image` can sniff) into a surface.
    pub fn decode(bytes: &[u8]) -> Result<Self, CropError> {
        let img = image::load_from_memory(bytes)?;
        Ok(Surface {
            rgba: img.to_rgba8(),
        })
    }

    pub fn width(&self) -> u32 {
        self.rgba.width()
    }

    pub fn height(&self) -> u32 {
        self.rgba.height()
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn rgba(&self) -> &RgbaImage {
        &self.rgba
    }

    /// Encode as an 8-bit RGBA PNG. Zero-area surfaces have no valid encoding.
    pub fn encode_png(&self) -> Result<Vec<u8>, CropError> {
        if self.is_empty() {
            return Err(CropError::EmptySurface {
                width: self.width(),
                height: self.height(),
            });
        }
        let mut buffer = Vec::new();
        write_png(&mut buffer, &self.rgba)?;
        Ok(buffer)
    }
}

fn write_png<W: io::Write>(w: W, image: &RgbaImage) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())
}
