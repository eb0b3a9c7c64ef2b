use crate::geometry::{CropRect, PixelRect, MAX_SURFACE_PIXELS};
use crate::surface::Surface;
use image::{imageops, Rgba, RgbaImage};

/// Cut `rect` (document units) out of a page rendered at `scale`.
///
/// The result is `floor(w) x floor(h)` pixels of the scaled rectangle. A
/// non-positive, NaN or infinite extent yields a zero-area surface, and so
/// does a region larger than `MAX_SURFACE_PIXELS`. Pixels that fall outside
/// the page are transparent.
pub fn extract_region(page: &Surface, rect: &CropRect, scale: f64) -> Surface {
    let src = rect.scaled(scale);
    let (width, height) = src.output_size();
    log::debug!(
        "extracting {}x{} from ({:.1}, {:.1}) on a {}x{} page",
        width,
        height,
        src.x,
        src.y,
        page.width(),
        page.height()
    );

    if width == 0 || height == 0 {
        return Surface::from_rgba(RgbaImage::new(width, height));
    }

    if u64::from(width) * u64::from(height) > MAX_SURFACE_PIXELS {
        log::warn!(
            "crop region {}x{} exceeds the {} pixel limit, result is empty",
            width,
            height,
            MAX_SURFACE_PIXELS
        );
        return Surface::from_rgba(RgbaImage::new(0, 0));
    }

    if let Some((x, y)) = aligned_origin(&src, width, height, page) {
        let cropped = imageops::crop_imm(page.rgba(), x, y, width, height).to_image();
        return Surface::from_rgba(cropped);
    }

    Surface::from_rgba(sample_region(page.rgba(), &src, width, height))
}

/// Origin of `src` when it lands exactly on the pixel grid, has exactly the
/// output size and lies fully inside the page.
fn aligned_origin(src: &PixelRect, width: u32, height: u32, page: &Surface) -> Option<(u32, u32)> {
    let integral = |v: f64| v.fract() == 0.0 && v >= 0.0;
    if !(integral(src.x) && integral(src.y)) {
        return None;
    }
    if src.width != f64::from(width) || src.height != f64::from(height) {
        return None;
    }
    let (x, y) = (src.x as u64, src.y as u64);
    if x + u64::from(width) > u64::from(page.width()) || y + u64::from(height) > u64::from(page.height()) {
        return None;
    }
    Some((x as u32, y as u32))
}

/// Nearest-neighbour copy: each destination pixel takes the source pixel under
/// its centre.
fn sample_region(page: &RgbaImage, src: &PixelRect, width: u32, height: u32) -> RgbaImage {
    let step_x = src.width / f64::from(width);
    let step_y = src.height / f64::from(height);
    let transparent = Rgba([0, 0, 0, 0]);

    RgbaImage::from_fn(width, height, |dx, dy| {
        let sx = (src.x + (f64::from(dx) + 0.5) * step_x).floor();
        let sy = (src.y + (f64::from(dy) + 0.5) * step_y).floor();
        if sx < 0.0 || sy < 0.0 || sx >= f64::from(page.width()) || sy >= f64::from(page.height()) {
            transparent
        } else {
            *page.get_pixel(sx as u32, sy as u32)
        }
    })
}
