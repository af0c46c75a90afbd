use glam::{Vec2, Vec3};
use thiserror::Error;

use crate::constants::MAX_CANVAS_SIZE;

#[derive(Debug, Error, PartialEq)]
pub enum SurfaceError {
    #[error("Invalid surface size: {width}x{height} (max {})", MAX_CANVAS_SIZE)]
    InvalidSize { width: u32, height: u32 },
    #[error("Collision geometry has no triangles")]
    EmptyGeometry,
    #[error("Collision geometry attribute {0} does not match the vertex count")]
    AttributeMismatch(&'static str),
}

/// Validate canvas dimensions
pub fn validate_size(width: u32, height: u32) -> Result<(), SurfaceError> {
    if width == 0 || height == 0 || width > MAX_CANVAS_SIZE || height > MAX_CANVAS_SIZE {
        return Err(SurfaceError::InvalidSize { width, height });
    }
    Ok(())
}

/// True if both components are finite
#[inline]
pub fn is_finite_vec2(v: Vec2) -> bool {
    v.x.is_finite() && v.y.is_finite()
}

/// True if all three components are finite
#[inline]
pub fn is_finite_vec3(v: Vec3) -> bool {
    v.x.is_finite() && v.y.is_finite() && v.z.is_finite()
}
