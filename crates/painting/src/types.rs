use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Result of a ray cast against the canvas collision geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    /// World-space intersection point
    pub point: Vec3,
    /// Unit surface normal at the hit
    pub normal: Vec3,
    /// Interpolated texture coordinate (0..1), None if the geometry has no UVs
    pub uv: Option<Vec2>,
    /// Distance along the ray
    pub distance: f32,
    /// Index of the triangle that was hit
    pub face_id: u32,
}

/// Physical corners of the paint surface, used to place generated paths
///
/// `left_up` and `center` are derived, the surface is assumed to be a
/// parallelogram.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurfaceCorners {
    pub left_low: Vec3,
    pub right_top: Vec3,
    pub right_low: Vec3,
}

impl SurfaceCorners {
    pub fn new(left_low: Vec3, right_low: Vec3, right_top: Vec3) -> Self {
        Self { left_low, right_top, right_low }
    }

    /// Axis-aligned rectangle in the XY plane at depth `z`
    pub fn xy_rect(min: Vec2, max: Vec2, z: f32) -> Self {
        Self {
            left_low: Vec3::new(min.x, min.y, z),
            right_low: Vec3::new(max.x, min.y, z),
            right_top: Vec3::new(max.x, max.y, z),
        }
    }

    pub fn left_low(&self) -> Vec3 {
        self.left_low
    }

    pub fn right_low(&self) -> Vec3 {
        self.right_low
    }

    pub fn right_top(&self) -> Vec3 {
        self.right_top
    }

    pub fn left_up(&self) -> Vec3 {
        self.left_low + (self.right_top - self.right_low)
    }

    pub fn center(&self) -> Vec3 {
        (self.left_low + self.right_top) * 0.5
    }

    /// Edge from left_low to right_low
    pub fn width_axis(&self) -> Vec3 {
        self.right_low - self.left_low
    }

    /// Edge from right_low to right_top
    pub fn height_axis(&self) -> Vec3 {
        self.right_top - self.right_low
    }

    /// Normal facing the viewer (-Z for an XY rectangle)
    pub fn normal(&self) -> Vec3 {
        self.height_axis().cross(self.width_axis()).normalize_or_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_corners() {
        let corners = SurfaceCorners::xy_rect(Vec2::new(-1.0, -2.0), Vec2::new(3.0, 2.0), 0.0);

        assert_eq!(corners.left_up(), Vec3::new(-1.0, 2.0, 0.0));
        assert_eq!(corners.center(), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(corners.normal(), Vec3::NEG_Z);
    }
}
