//! PNG export of the committed canvas

use std::path::Path;

use image::{DynamicImage, Rgba32FImage};
use painting::CpuSurface;
use tracing::info;

use crate::error::AppError;

/// Convert `surface` to an 8-bit RGBA image, top row first.
///
/// Texture row 0 is the bottom of the canvas, image row 0 is the top.
pub fn canvas_image(surface: &CpuSurface) -> Result<image::RgbaImage, AppError> {
    let (width, height) = (surface.width, surface.height);
    let mut float_image = Rgba32FImage::from_raw(width, height, surface.channels().to_vec())
        .ok_or(AppError::Buffer { width, height })?;
    image::imageops::flip_vertical_in_place(&mut float_image);
    Ok(DynamicImage::ImageRgba32F(float_image).to_rgba8())
}

/// Write `surface` as an RGBA8 PNG
pub fn export_png(surface: &CpuSurface, path: &Path) -> Result<(), AppError> {
    canvas_image(surface)?.save(path)?;
    info!("Canvas exported to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canvas_image_flips_rows() {
        let mut surface = CpuSurface::filled(3, 2, [1.0, 1.0, 1.0, 1.0]);
        surface.set_pixel(0, 0, [1.0, 0.0, 0.0, 1.0]);

        let image = canvas_image(&surface).unwrap();
        assert_eq!(image.dimensions(), (3, 2));
        // Bottom-left texel lands in the last image row
        assert_eq!(image.get_pixel(0, 1).0, [255, 0, 0, 255]);
        assert_eq!(image.get_pixel(0, 0).0, [255, 255, 255, 255]);
    }
}
