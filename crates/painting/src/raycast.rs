//! Ray casts against the canvas collision geometry.
//!
//! The paint surface resolves world positions to texture coordinates by
//! casting rays at its collider. [`CollisionQuery`] is the seam: the game
//! supplies whatever geometry it has, [`MeshCollider`] covers triangle meshes
//! (including the flat quad used by the default canvas) with the
//! Moller-Trumbore algorithm.

use glam::{Vec2, Vec3};

use crate::types::{SurfaceCorners, SurfaceHit};
use crate::validation::SurfaceError;

/// Epsilon for floating point comparisons in ray intersection
const EPSILON: f32 = 1e-6;

/// Collision capability of a paint surface
pub trait CollisionQuery {
    /// Cast a ray and return the closest hit within `max_distance`.
    ///
    /// `direction` does not need to be normalized; distances are reported
    /// in world units along the normalized direction.
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<SurfaceHit>;
}

/// Result of a ray-triangle intersection test
#[derive(Debug, Clone, Copy)]
pub struct TriangleHit {
    /// Distance along the ray to the intersection point
    pub t: f32,
    /// Barycentric coordinate u (weight for vertex 1)
    pub u: f32,
    /// Barycentric coordinate v (weight for vertex 2)
    pub v: f32,
}

/// Moller-Trumbore ray-triangle intersection algorithm.
///
/// Returns the hit distance and barycentric coordinates if the ray intersects
/// the triangle. Both faces are hit.
pub fn ray_triangle_intersection(
    ray_origin: Vec3,
    ray_dir: Vec3,
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
) -> Option<TriangleHit> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let pvec = ray_dir.cross(edge2);
    let det = edge1.dot(pvec);

    // Ray parallel to the triangle plane
    if det.abs() < EPSILON {
        return None;
    }

    let inv_det = 1.0 / det;
    let tvec = ray_origin - v0;

    let u = tvec.dot(pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let qvec = tvec.cross(edge1);
    let v = ray_dir.dot(qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = edge2.dot(qvec) * inv_det;

    // Only accept hits in front of the ray
    if t < EPSILON {
        return None;
    }

    Some(TriangleHit { t, u, v })
}

/// Interpolate a Vec3 attribute using barycentric coordinates.
pub fn interpolate_vec3(v0: Vec3, v1: Vec3, v2: Vec3, u: f32, v: f32) -> Vec3 {
    let w = 1.0 - u - v;
    v0 * w + v1 * u + v2 * v
}

/// Interpolate a Vec2 attribute (like UVs) using barycentric coordinates.
pub fn interpolate_vec2(v0: Vec2, v1: Vec2, v2: Vec2, u: f32, v: f32) -> Vec2 {
    let w = 1.0 - u - v;
    v0 * w + v1 * u + v2 * v
}

/// Triangle mesh collider with optional per-vertex normals and UVs.
#[derive(Debug, Clone)]
pub struct MeshCollider {
    /// Vertex positions
    positions: Vec<Vec3>,
    /// Triangle indices (3 per triangle)
    indices: Vec<u32>,
    /// Vertex normals (same length as positions, or empty to use face normals)
    normals: Vec<Vec3>,
    /// Vertex UVs (same length as positions, or empty if no UVs)
    uvs: Vec<Vec2>,
}

impl MeshCollider {
    pub fn new(
        positions: Vec<Vec3>,
        indices: Vec<u32>,
        normals: Vec<Vec3>,
        uvs: Vec<Vec2>,
    ) -> Result<Self, SurfaceError> {
        if indices.len() < 3 || indices.len() % 3 != 0 {
            return Err(SurfaceError::EmptyGeometry);
        }
        if indices.iter().any(|&i| i as usize >= positions.len()) {
            return Err(SurfaceError::AttributeMismatch("indices"));
        }
        if !normals.is_empty() && normals.len() != positions.len() {
            return Err(SurfaceError::AttributeMismatch("normals"));
        }
        if !uvs.is_empty() && uvs.len() != positions.len() {
            return Err(SurfaceError::AttributeMismatch("uvs"));
        }
        Ok(Self { positions, indices, normals, uvs })
    }

    /// Flat two-triangle canvas spanning the given corners.
    ///
    /// UV (0, 0) sits on `left_low`, (1, 1) on `right_top`. The normal faces
    /// the viewer (see [`SurfaceCorners::normal`]).
    pub fn quad(corners: &SurfaceCorners) -> Self {
        let normal = corners.normal();
        Self {
            positions: vec![
                corners.left_low(),
                corners.right_low(),
                corners.right_top(),
                corners.left_up(),
            ],
            indices: vec![0, 1, 2, 0, 2, 3],
            normals: vec![normal; 4],
            uvs: vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(0.0, 1.0),
            ],
        }
    }

    /// Get the number of triangles in the mesh
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the vertex indices for a triangle
    fn triangle_indices(&self, tri_index: usize) -> (usize, usize, usize) {
        let base = tri_index * 3;
        (
            self.indices[base] as usize,
            self.indices[base + 1] as usize,
            self.indices[base + 2] as usize,
        )
    }
}

impl CollisionQuery for MeshCollider {
    fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<SurfaceHit> {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO || !origin.is_finite() {
            return None;
        }

        let mut closest: Option<(TriangleHit, usize)> = None;

        // Brute force - canvases are a handful of triangles
        for tri_idx in 0..self.triangle_count() {
            let (i0, i1, i2) = self.triangle_indices(tri_idx);
            let Some(hit) = ray_triangle_intersection(
                origin,
                dir,
                self.positions[i0],
                self.positions[i1],
                self.positions[i2],
            ) else {
                continue;
            };
            if hit.t > max_distance {
                continue;
            }
            let dominated = matches!(&closest, Some((prev, _)) if hit.t >= prev.t);
            if !dominated {
                closest = Some((hit, tri_idx));
            }
        }

        closest.map(|(hit, tri_idx)| {
            let (i0, i1, i2) = self.triangle_indices(tri_idx);

            let normal = if self.normals.is_empty() {
                let (v0, v1, v2) = (self.positions[i0], self.positions[i1], self.positions[i2]);
                (v1 - v0).cross(v2 - v0).normalize_or_zero()
            } else {
                interpolate_vec3(self.normals[i0], self.normals[i1], self.normals[i2], hit.u, hit.v)
                    .normalize_or_zero()
            };

            let uv = (!self.uvs.is_empty()).then(|| {
                interpolate_vec2(self.uvs[i0], self.uvs[i1], self.uvs[i2], hit.u, hit.v)
            });

            SurfaceHit {
                point: origin + dir * hit.t,
                normal,
                uv,
                distance: hit.t,
                face_id: tri_idx as u32,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_triangle_hit() {
        // Triangle in XY plane at z=0
        let v0 = Vec3::new(0.0, 0.0, 0.0);
        let v1 = Vec3::new(1.0, 0.0, 0.0);
        let v2 = Vec3::new(0.0, 1.0, 0.0);

        // Ray pointing down at center of triangle
        let origin = Vec3::new(0.25, 0.25, 1.0);
        let dir = Vec3::new(0.0, 0.0, -1.0);

        let hit = ray_triangle_intersection(origin, dir, v0, v1, v2).unwrap();
        assert!((hit.t - 1.0).abs() < EPSILON);
        assert!((hit.u - 0.25).abs() < EPSILON);
        assert!((hit.v - 0.25).abs() < EPSILON);
    }

    #[test]
    fn test_ray_triangle_miss_and_behind() {
        let v0 = Vec3::new(0.0, 0.0, 0.0);
        let v1 = Vec3::new(1.0, 0.0, 0.0);
        let v2 = Vec3::new(0.0, 1.0, 0.0);

        let miss = ray_triangle_intersection(Vec3::new(2.0, 2.0, 1.0), Vec3::NEG_Z, v0, v1, v2);
        assert!(miss.is_none());

        let behind = ray_triangle_intersection(Vec3::new(0.25, 0.25, 1.0), Vec3::Z, v0, v1, v2);
        assert!(behind.is_none());
    }

    #[test]
    fn test_interpolate_vec2() {
        let v0 = Vec2::new(0.0, 0.0);
        let v1 = Vec2::new(1.0, 0.0);
        let v2 = Vec2::new(0.0, 1.0);

        assert!((interpolate_vec2(v0, v1, v2, 0.0, 0.0) - v0).length() < EPSILON);
        assert!((interpolate_vec2(v0, v1, v2, 1.0, 0.0) - v1).length() < EPSILON);
        assert!((interpolate_vec2(v0, v1, v2, 0.0, 1.0) - v2).length() < EPSILON);

        let center = (v0 + v1 + v2) / 3.0;
        let result = interpolate_vec2(v0, v1, v2, 1.0 / 3.0, 1.0 / 3.0);
        assert!((result - center).length() < EPSILON);
    }

    #[test]
    fn test_quad_uv_and_normal() {
        let corners = SurfaceCorners::xy_rect(Vec2::new(0.0, 0.0), Vec2::new(4.0, 2.0), 0.0);
        let collider = MeshCollider::quad(&corners);

        let hit = collider
            .raycast(Vec3::new(1.0, 1.5, -1.0), Vec3::Z, 10.0)
            .unwrap();
        let uv = hit.uv.unwrap();
        assert!((uv - Vec2::new(0.25, 0.75)).length() < 1e-5);
        assert!((hit.normal - Vec3::NEG_Z).length() < 1e-5);
        assert!((hit.distance - 1.0).abs() < 1e-5);
        assert!((hit.point - Vec3::new(1.0, 1.5, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_quad_respects_max_distance_and_edges() {
        let corners = SurfaceCorners::xy_rect(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0), 0.0);
        let collider = MeshCollider::quad(&corners);

        assert!(collider.raycast(Vec3::new(0.5, 0.5, -2.0), Vec3::Z, 1.0).is_none());
        assert!(collider.raycast(Vec3::new(1.5, 0.5, -1.0), Vec3::Z, 5.0).is_none());
        assert!(collider.raycast(Vec3::new(0.5, 0.5, -1.0), Vec3::ZERO, 5.0).is_none());
    }

    #[test]
    fn test_mesh_collider_validation() {
        assert_eq!(
            MeshCollider::new(vec![Vec3::ZERO], vec![], vec![], vec![]).err(),
            Some(SurfaceError::EmptyGeometry)
        );
        assert_eq!(
            MeshCollider::new(vec![Vec3::ZERO; 3], vec![0, 1, 5], vec![], vec![]).err(),
            Some(SurfaceError::AttributeMismatch("indices"))
        );
    }
}
