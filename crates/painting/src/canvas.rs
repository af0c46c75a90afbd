//! Raster paint surface: pixel buffer plus world/texture mapping
//!
//! The surface owns the canvas buffer (working + committed tiles) and the
//! collision geometry it is drawn on. World positions are resolved to pixel
//! coordinates by casting rays against that geometry.

use brushtrail_config::SurfaceConfig;
use glam::{Vec2, Vec3};
use tracing::{debug, info};

use crate::raycast::{CollisionQuery, MeshCollider};
use crate::surface::CpuSurface;
use crate::tiles::{DirtyRegion, TiledSurface};
use crate::types::{SurfaceCorners, SurfaceHit};
use crate::validation::{is_finite_vec3, validate_size, SurfaceError};

/// Dedicated ray used to sample the surface normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalProbe {
    pub origin: Vec3,
    pub forward: Vec3,
    pub max_distance: f32,
}

impl NormalProbe {
    /// Probe sitting `distance` in front of the surface center, looking at it
    pub fn facing(corners: &SurfaceCorners, distance: f32) -> Self {
        let normal = corners.normal();
        Self {
            origin: corners.center() + normal * distance,
            forward: -normal,
            max_distance: distance * 2.0,
        }
    }
}

/// Canvas buffer bound to collision geometry
pub struct RasterPaintSurface<C: CollisionQuery = MeshCollider> {
    tiles: TiledSurface,
    collider: C,
    corners: SurfaceCorners,
    probe: NormalProbe,
    config: SurfaceConfig,
    /// Last sampled normal, None when stale
    cached_normal: Option<Vec3>,
    since_normal_refresh: f32,
}

impl RasterPaintSurface<MeshCollider> {
    /// Flat quad canvas spanning `corners`, with a probe one unit in front
    pub fn flat(config: SurfaceConfig, corners: SurfaceCorners) -> Result<Self, SurfaceError> {
        let collider = MeshCollider::quad(&corners);
        let probe = NormalProbe::facing(&corners, 1.0);
        Self::new(config, collider, corners, probe)
    }
}

impl<C: CollisionQuery> RasterPaintSurface<C> {
    pub fn new(
        config: SurfaceConfig,
        collider: C,
        corners: SurfaceCorners,
        probe: NormalProbe,
    ) -> Result<Self, SurfaceError> {
        validate_size(config.width, config.height)?;
        let tiles = TiledSurface::new(config.width, config.height, config.tile_size, config.base_color);
        Ok(Self {
            tiles,
            collider,
            corners,
            probe,
            config,
            cached_normal: None,
            since_normal_refresh: 0.0,
        })
    }

    /// (Re)allocate the pixel buffer and fill every pixel with `base_color`
    pub fn initialize(
        &mut self,
        base_color: [f32; 4],
        width: u32,
        height: u32,
    ) -> Result<(), SurfaceError> {
        validate_size(width, height)?;
        self.tiles = TiledSurface::new(width, height, self.config.tile_size, base_color);
        self.config.width = width;
        self.config.height = height;
        self.config.base_color = base_color;
        info!("RasterPaintSurface::initialize: {}x{}", width, height);
        Ok(())
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.tiles.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.tiles.height()
    }

    pub fn base_color(&self) -> [f32; 4] {
        self.config.base_color
    }

    pub fn tiles(&self) -> &TiledSurface {
        &self.tiles
    }

    /// Pixels as of the last `apply_paint`/`clear_texture`
    pub fn committed(&self) -> &CpuSurface {
        self.tiles.committed()
    }

    /// Pixels including pending stamps
    pub fn working(&self) -> &CpuSurface {
        self.tiles.working()
    }

    /// Stamp a rotated, anisotropic brush at a texture coordinate
    pub fn paint_circle_additive(
        &mut self,
        center: Vec2,
        diameter: u32,
        color: [f32; 4],
        rotation_degrees: f32,
        scale_x: f32,
        scale_y: f32,
    ) -> Option<(u32, u32, u32, u32)> {
        self.tiles
            .paint_circle_additive(center, diameter, color, rotation_degrees, scale_x, scale_y)
    }

    /// Stamp without rotation, for brushes that have no facing
    pub fn paint_circle_additive_unrotated(
        &mut self,
        center: Vec2,
        diameter: u32,
        color: [f32; 4],
        scale_x: f32,
        scale_y: f32,
    ) -> Option<(u32, u32, u32, u32)> {
        self.tiles
            .paint_circle_additive_unrotated(center, diameter, color, scale_x, scale_y)
    }

    /// Commit pending stamps; returns the regions to upload
    pub fn apply_paint(&mut self) -> Vec<DirtyRegion> {
        self.tiles.apply_paint()
    }

    /// Fill every pixel with `color` and commit immediately
    pub fn clear_texture(&mut self, color: [f32; 4]) -> DirtyRegion {
        debug!("RasterPaintSurface::clear_texture: {:?}", color);
        self.tiles.clear(color)
    }

    /// Advance the normal cache clock
    pub fn update(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        self.since_normal_refresh += dt;
        if self.since_normal_refresh >= self.config.normal_refresh_interval {
            self.since_normal_refresh = 0.0;
            self.cached_normal = None;
        }
    }

    /// Cast the probe ray and return the hit normal, or zero on a miss
    pub fn get_normal(&self) -> Vec3 {
        self.collider
            .raycast(self.probe.origin, self.probe.forward, self.probe.max_distance)
            .map(|hit| hit.normal)
            .unwrap_or(Vec3::ZERO)
    }

    /// Surface normal, re-sampled at most once per refresh interval
    pub fn surface_normal(&mut self) -> Vec3 {
        if let Some(normal) = self.cached_normal {
            return normal;
        }
        let normal = self.get_normal();
        debug!("RasterPaintSurface: refreshed normal {:?}", normal);
        self.cached_normal = Some(normal);
        normal
    }

    /// Convert a normalized UV to pixel coordinates
    #[inline]
    pub fn uv_to_texture(&self, uv: Vec2) -> Vec2 {
        uv * Vec2::new(self.width() as f32, self.height() as f32)
    }

    /// Resolve a world position on (or near) the surface to pixel coordinates.
    ///
    /// The ray starts slightly in front of the surface and travels along the
    /// inverse of the cached normal. Returns (0, 0) on a miss.
    pub fn world_to_texture_coord(&mut self, world_position: Vec3) -> Vec2 {
        if !is_finite_vec3(world_position) {
            return Vec2::ZERO;
        }
        let normal = self.surface_normal();
        if normal == Vec3::ZERO {
            return Vec2::ZERO;
        }

        let origin = world_position + normal * self.config.probe_offset;
        let max_distance = self.config.max_ray_distance + self.config.probe_offset;
        match self.collider.raycast(origin, -normal, max_distance) {
            Some(SurfaceHit { uv: Some(uv), .. }) => self.uv_to_texture(uv),
            _ => Vec2::ZERO,
        }
    }

    /// Cast an arbitrary ray (e.g. from the pointer) against the surface.
    ///
    /// Returns the hit together with its pixel coordinate.
    pub fn raycast_texture(&self, origin: Vec3, direction: Vec3) -> Option<(SurfaceHit, Vec2)> {
        let hit = self.collider.raycast(origin, direction, f32::MAX)?;
        let uv = hit.uv?;
        Some((hit, self.uv_to_texture(uv)))
    }

    pub fn corners(&self) -> &SurfaceCorners {
        &self.corners
    }

    pub fn left_low(&self) -> Vec3 {
        self.corners.left_low()
    }

    pub fn right_top(&self) -> Vec3 {
        self.corners.right_top()
    }

    pub fn right_low(&self) -> Vec3 {
        self.corners.right_low()
    }

    pub fn left_up(&self) -> Vec3 {
        self.corners.left_up()
    }

    pub fn center(&self) -> Vec3 {
        self.corners.center()
    }
}
