//! CPU surface for painting - straight-alpha RGBA storage

/// A straight-alpha RGBA CPU surface
/// Stores pixels as [f32; 4] in row-major order, row 0 at the bottom edge
#[derive(Debug, Clone)]
pub struct CpuSurface {
    /// Surface dimensions
    pub width: u32,
    pub height: u32,
    /// Pixel data in row-major order, each pixel is [r, g, b, a] as f32
    pixels: Vec<[f32; 4]>,
}

impl CpuSurface {
    /// Create a new surface with the given dimensions, initialized to transparent black
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, [0.0, 0.0, 0.0, 0.0])
    }

    /// Create a new surface with every pixel set to `color`
    pub fn filled(width: u32, height: u32, color: [f32; 4]) -> Self {
        let pixel_count = (width as usize) * (height as usize);
        Self {
            width,
            height,
            pixels: vec![color; pixel_count],
        }
    }

    /// Clear the surface to a solid color
    pub fn clear(&mut self, color: [f32; 4]) {
        self.pixels.fill(color);
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    /// Get a pixel at the given coordinates
    /// Returns None if coordinates are out of bounds
    #[inline]
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        self.index(x, y).map(|index| self.pixels[index])
    }

    /// Set a pixel at the given coordinates
    /// Does nothing if coordinates are out of bounds
    #[inline]
    pub fn set_pixel(&mut self, x: u32, y: u32, color: [f32; 4]) {
        if let Some(index) = self.index(x, y) {
            self.pixels[index] = color;
        }
    }

    /// Blend a color onto an existing pixel, weighted by the color's alpha
    /// Formula: out = dst * (1 - alpha) + src * alpha, applied to all four channels
    ///
    /// alpha = 1 replaces the pixel, alpha = 0 leaves it untouched.
    #[inline]
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: [f32; 4]) {
        let Some(index) = self.index(x, y) else {
            return;
        };
        let dst = self.pixels[index];
        let alpha = color[3];
        let inv_alpha = 1.0 - alpha;

        self.pixels[index] = [
            dst[0] * inv_alpha + color[0] * alpha,
            dst[1] * inv_alpha + color[1] * alpha,
            dst[2] * inv_alpha + color[2] * alpha,
            dst[3] * inv_alpha + color[3] * alpha,
        ];
    }

    /// Copy a rectangle of pixels from another surface of the same size
    /// The rectangle is clamped to both surfaces' bounds
    pub fn copy_region_from(&mut self, src: &CpuSurface, x: u32, y: u32, w: u32, h: u32) {
        let x_end = (x.saturating_add(w)).min(self.width).min(src.width);
        let y_end = (y.saturating_add(h)).min(self.height).min(src.height);
        if x >= x_end || y >= y_end {
            return;
        }

        for row in y..y_end {
            let dst_start = (row as usize) * (self.width as usize) + (x as usize);
            let src_start = (row as usize) * (src.width as usize) + (x as usize);
            let len = (x_end - x) as usize;
            self.pixels[dst_start..dst_start + len]
                .copy_from_slice(&src.pixels[src_start..src_start + len]);
        }
    }

    /// Pixel data for a rectangle as RGBA8 bytes (row-major)
    /// The region is clamped to surface bounds
    pub fn region_rgba8(&self, x: u32, y: u32, w: u32, h: u32) -> Vec<u8> {
        let x_end = (x.saturating_add(w)).min(self.width);
        let y_end = (y.saturating_add(h)).min(self.height);
        let mut data =
            Vec::with_capacity((x_end.saturating_sub(x) * y_end.saturating_sub(y) * 4) as usize);

        for row in y..y_end {
            for col in x..x_end {
                if let Some(pixel) = self.get_pixel(col, row) {
                    data.extend(pixel.iter().map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8));
                }
            }
        }

        data
    }

    /// Pixels flattened to interleaved RGBA channels, row-major
    pub fn channels(&self) -> &[f32] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Get the total number of pixels
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    /// Get direct access to pixel data
    #[inline]
    pub fn pixels(&self) -> &[[f32; 4]] {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_surface() {
        let surface = CpuSurface::new(100, 100);
        assert_eq!(surface.width, 100);
        assert_eq!(surface.height, 100);
        assert_eq!(surface.pixel_count(), 10000);
    }

    #[test]
    fn test_get_set_pixel() {
        let mut surface = CpuSurface::new(10, 10);
        let color = [1.0, 0.5, 0.25, 1.0];

        surface.set_pixel(5, 5, color);
        assert_eq!(surface.get_pixel(5, 5), Some(color));

        // Out of bounds should return None
        assert_eq!(surface.get_pixel(100, 100), None);
        surface.set_pixel(100, 100, color);
    }

    #[test]
    fn test_clear() {
        let mut surface = CpuSurface::new(10, 10);
        let white = [1.0, 1.0, 1.0, 1.0];

        surface.clear(white);

        assert!(surface.pixels().iter().all(|p| *p == white));
    }

    #[test]
    fn test_blend_pixel_half_alpha() {
        let mut surface = CpuSurface::filled(10, 10, [1.0, 1.0, 1.0, 1.0]);

        surface.blend_pixel(5, 5, [1.0, 0.0, 0.0, 0.5]);

        let result = surface.get_pixel(5, 5).unwrap();
        assert!((result[0] - 1.0).abs() < 1e-6);
        assert!((result[1] - 0.5).abs() < 1e-6);
        assert!((result[2] - 0.5).abs() < 1e-6);
        assert!((result[3] - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_blend_pixel_identity_laws() {
        let base = [0.1, 0.7, 0.3, 0.9];
        let mut surface = CpuSurface::filled(4, 4, base);

        surface.blend_pixel(1, 1, [0.3, 0.2, 0.8, 1.0]);
        assert_eq!(surface.get_pixel(1, 1), Some([0.3, 0.2, 0.8, 1.0]));

        surface.blend_pixel(2, 2, [0.3, 0.2, 0.8, 0.0]);
        assert_eq!(surface.get_pixel(2, 2), Some(base));
    }

    #[test]
    fn test_copy_region_and_rgba8() {
        let src = CpuSurface::filled(8, 8, [1.0, 0.0, 0.0, 1.0]);
        let mut dst = CpuSurface::new(8, 8);

        dst.copy_region_from(&src, 2, 2, 3, 3);
        assert_eq!(dst.get_pixel(2, 2), Some([1.0, 0.0, 0.0, 1.0]));
        assert_eq!(dst.get_pixel(4, 4), Some([1.0, 0.0, 0.0, 1.0]));
        assert_eq!(dst.get_pixel(5, 5), Some([0.0, 0.0, 0.0, 0.0]));

        let bytes = dst.region_rgba8(2, 2, 1, 1);
        assert_eq!(bytes, vec![255, 0, 0, 255]);
    }

    #[test]
    fn test_channels_interleaved() {
        let mut surface = CpuSurface::new(2, 2);
        surface.set_pixel(1, 0, [0.1, 0.2, 0.3, 0.4]);

        let channels = surface.channels();
        assert_eq!(channels.len(), 16);
        assert_eq!(&channels[4..8], &[0.1, 0.2, 0.3, 0.4]);
    }
}
