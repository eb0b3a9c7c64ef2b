use serde::{Deserialize, Serialize};

/// Magnification applied both when rasterizing the page and when mapping a
/// crop rectangle onto the rendered pixels.
pub const MAGNIFICATION: f64 = 1.5;

/// Fixed rectangle used by the auto-crop trigger.
pub const AUTO_CROP: CropRect = CropRect {
    tlx: 190.0,
    tly: 28.0,
    brx: 407.0,
    bry: 382.0,
};

/// Largest surface area, in pixels, that extraction will allocate. Same as
/// the canvas area limit browsers enforce (16384 x 16384).
pub const MAX_SURFACE_PIXELS: u64 = 268_435_456;

/// Crop rectangle in document units (PDF points at 1x).
///
/// Ordering is not enforced: an inverted or NaN rectangle maps to a
/// zero-area pixel region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub tlx: f64,
    pub tly: f64,
    pub brx: f64,
    pub bry: f64,
}

impl CropRect {
    pub fn new(tlx: f64, tly: f64, brx: f64, bry: f64) -> Self {
        CropRect { tlx, tly, brx, bry }
    }

    /// Parse four raw text fields the way an HTML number input is read:
    /// anything that is not a number becomes NaN.
    pub fn from_fields(tlx: &str, tly: &str, brx: &str, bry: &str) -> Self {
        CropRect {
            tlx: parse_float_lenient(tlx),
            tly: parse_float_lenient(tly),
            brx: parse_float_lenient(brx),
            bry: parse_float_lenient(bry),
        }
    }

    /// Map onto a surface rendered at `scale`.
    pub fn scaled(&self, scale: f64) -> PixelRect {
        PixelRect {
            x: self.tlx * scale,
            y: self.tly * scale,
            width: (self.brx - self.tlx) * scale,
            height: (self.bry - self.tly) * scale,
        }
    }
}

/// Source rectangle in rendered-surface pixels. Fractional on purpose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    /// Integer size of the surface cut from this rectangle. Negative, NaN and
    /// infinite extents clamp to zero.
    pub fn output_size(&self) -> (u32, u32) {
        (floor_dimension(self.width), floor_dimension(self.height))
    }
}

fn floor_dimension(v: f64) -> u32 {
    // a canvas given an infinite width ends up 0 wide
    if !v.is_finite() || v <= 0.0 {
        0
    } else {
        // `as` saturates at u32::MAX
        v.floor() as u32
    }
}

/// JavaScript `parseFloat` semantics: skip leading whitespace, take the
/// longest numeric prefix, accept `Infinity`, otherwise NaN.
pub fn parse_float_lenient(input: &str) -> f64 {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut i = 0;

    let negative = match bytes.first() {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };

    if s[i..].starts_with("Infinity") {
        return if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_part = &s[int_start..i];

    let mut frac_part = "";
    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        frac_part = &s[frac_start..j];
        i = j;
    }

    if int_part.is_empty() && frac_part.is_empty() {
        return f64::NAN;
    }

    let mut exp_part = String::new();
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        let mut sign = "";
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            sign = if bytes[j] == b'-' { "-" } else { "" };
            j += 1;
        }
        let digits_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        // "1e" and "1e+" stop before the exponent
        if j > digits_start {
            exp_part = format!("e{}{}", sign, &s[digits_start..j]);
        }
    }

    let literal = format!(
        "{}{}.{}{}",
        if negative { "-" } else { "" },
        if int_part.is_empty() { "0" } else { int_part },
        if frac_part.is_empty() { "0" } else { frac_part },
        exp_part
    );
    literal.parse().unwrap_or(f64::NAN)
}
