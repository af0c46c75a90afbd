//! Brush stamping into the working buffer

use glam::Vec2;
use tracing::debug;

use super::TiledSurface;

/// One term of the mask test: |v|^exponent
#[inline]
fn mask_term(v: f32, exponent: f32) -> f32 {
    if exponent == 2.0 {
        v * v
    } else {
        v.abs().powf(exponent)
    }
}

impl TiledSurface {
    /// Stamp a rotated, anisotropic circular brush.
    ///
    /// Every integer offset `(x, y)` of the diameter's bounding square is
    /// rotated by `rotation_degrees` and kept when
    /// `|x|^scale_x + |y|^scale_y < (radius - 0.5)^2`. Kept pixels are
    /// blended with `color` weighted by its alpha.
    ///
    /// `scale_x`/`scale_y` are exponents, not axis lengths: 2.0/2.0 gives a
    /// disc, other values reshape the footprint.
    ///
    /// # Returns
    /// Bounding box of painted pixels (x, y, width, height), or None if
    /// nothing landed on the surface.
    pub fn paint_circle_additive(
        &mut self,
        center: Vec2,
        diameter: u32,
        color: [f32; 4],
        rotation_degrees: f32,
        scale_x: f32,
        scale_y: f32,
    ) -> Option<(u32, u32, u32, u32)> {
        if !rotation_degrees.is_finite() {
            debug!("paint_circle_additive: skipped non-finite rotation");
            return None;
        }
        let (sin, cos) = rotation_degrees.to_radians().sin_cos();
        self.stamp(center, diameter, color, Some((sin, cos)), scale_x, scale_y)
    }

    /// Same as [`Self::paint_circle_additive`] without the rotation step.
    pub fn paint_circle_additive_unrotated(
        &mut self,
        center: Vec2,
        diameter: u32,
        color: [f32; 4],
        scale_x: f32,
        scale_y: f32,
    ) -> Option<(u32, u32, u32, u32)> {
        self.stamp(center, diameter, color, None, scale_x, scale_y)
    }

    fn stamp(
        &mut self,
        center: Vec2,
        diameter: u32,
        color: [f32; 4],
        rotation: Option<(f32, f32)>,
        scale_x: f32,
        scale_y: f32,
    ) -> Option<(u32, u32, u32, u32)> {
        if !center.is_finite() || diameter == 0 || !color.iter().all(|c| c.is_finite()) {
            debug!("stamp: skipped invalid input at {:?}", center);
            return None;
        }

        let radius = diameter as f32 / 2.0;
        let limit = (radius - 0.5) * (radius - 0.5);
        let half = (diameter / 2) as i64;
        let cx = center.x.floor() as i64;
        let cy = center.y.floor() as i64;
        let width = self.width() as i64;
        let height = self.height() as i64;

        let mut min_x = i64::MAX;
        let mut min_y = i64::MAX;
        let mut max_x = i64::MIN;
        let mut max_y = i64::MIN;

        for oy in -half..=half {
            let py = cy + oy;
            if py < 0 || py >= height {
                continue;
            }
            for ox in -half..=half {
                let px = cx + ox;
                if px < 0 || px >= width {
                    continue;
                }

                let (mut x, mut y) = (ox as f32, oy as f32);
                if let Some((sin, cos)) = rotation {
                    let rx = x * cos - y * sin;
                    let ry = x * sin + y * cos;
                    x = rx;
                    y = ry;
                }

                if mask_term(x, scale_x) + mask_term(y, scale_y) >= limit {
                    continue;
                }

                self.working.blend_pixel(px as u32, py as u32, color);
                min_x = min_x.min(px);
                min_y = min_y.min(py);
                max_x = max_x.max(px);
                max_y = max_y.max(py);
            }
        }

        if min_x > max_x {
            return None;
        }

        let (x, y) = (min_x as u32, min_y as u32);
        let (w, h) = ((max_x - min_x + 1) as u32, (max_y - min_y + 1) as u32);
        self.dirty.mark_rect(x, y, w, h);
        Some((x, y, w, h))
    }
}
