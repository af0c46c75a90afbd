//! Tile management, dirty tracking and batched commits for the canvas buffer
//!
//! Stamps are written into a working surface. Nothing becomes visible to
//! consumers of the committed surface until [`TiledSurface::apply_paint`]
//! copies the dirty tiles across.

mod commit;
mod dirty_tracking;
mod stamp;

use crate::surface::CpuSurface;

pub use commit::DirtyRegion;
pub use dirty_tracking::DirtyTiles;

/// Tile coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
}

/// Double-buffered surface with per-tile dirty tracking
pub struct TiledSurface {
    /// Receives stamps; not visible until committed
    pub(crate) working: CpuSurface,
    /// Last committed state, mirrors what has been uploaded
    pub(crate) committed: CpuSurface,
    pub(crate) tile_size: u32,
    tiles_x: u32,
    tiles_y: u32,
    pub(crate) dirty: DirtyTiles,
}

impl TiledSurface {
    /// Create a new tiled surface filled with `base_color` in both buffers
    pub fn new(width: u32, height: u32, tile_size: u32, base_color: [f32; 4]) -> Self {
        let tile_size = tile_size.max(1);
        Self {
            working: CpuSurface::filled(width, height, base_color),
            committed: CpuSurface::filled(width, height, base_color),
            tile_size,
            tiles_x: width.div_ceil(tile_size),
            tiles_y: height.div_ceil(tile_size),
            dirty: DirtyTiles::new(width, height, tile_size),
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.working.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.working.height
    }

    /// Get the tile size
    #[inline]
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Get the number of tiles in x direction
    #[inline]
    pub fn tiles_x(&self) -> u32 {
        self.tiles_x
    }

    /// Get the number of tiles in y direction
    #[inline]
    pub fn tiles_y(&self) -> u32 {
        self.tiles_y
    }

    /// Tiles stamped since the last commit
    #[inline]
    pub fn dirty(&self) -> &DirtyTiles {
        &self.dirty
    }

    /// Surface holding uncommitted stamps
    #[inline]
    pub fn working(&self) -> &CpuSurface {
        &self.working
    }

    /// Surface as of the last commit
    #[inline]
    pub fn committed(&self) -> &CpuSurface {
        &self.committed
    }

    /// Fill both buffers with `color` and drop any pending dirty tiles.
    ///
    /// Returns the full-surface region so callers can re-upload it.
    pub fn clear(&mut self, color: [f32; 4]) -> DirtyRegion {
        self.working.clear(color);
        self.committed.clear(color);
        self.dirty.clear();
        DirtyRegion {
            offset: (0, 0),
            size: (self.width(), self.height()),
            data: self.committed.region_rgba8(0, 0, self.width(), self.height()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

    #[test]
    fn test_tiled_surface_creation() {
        let surface = TiledSurface::new(256, 256, 128, WHITE);
        assert_eq!(surface.tiles_x(), 2);
        assert_eq!(surface.tiles_y(), 2);
        assert_eq!(surface.tile_size(), 128);
        assert_eq!(surface.working().get_pixel(0, 0), Some(WHITE));
    }

    #[test]
    fn test_tiled_surface_non_aligned() {
        // 342x342 with 128 tile size should give 3x3 tiles
        let surface = TiledSurface::new(342, 342, 128, WHITE);
        assert_eq!(surface.tiles_x(), 3);
        assert_eq!(surface.tiles_y(), 3);
    }

    #[test]
    fn test_stamp_marks_dirty_but_not_committed() {
        let mut surface = TiledSurface::new(256, 256, 128, WHITE);

        let result = surface.paint_circle_additive_unrotated(
            glam::Vec2::new(128.0, 128.0),
            21,
            RED,
            2.0,
            2.0,
        );
        assert!(result.is_some());
        assert_eq!(surface.dirty().len(), 4);

        assert_eq!(surface.working().get_pixel(128, 128), Some(RED));
        assert_eq!(surface.committed().get_pixel(128, 128), Some(WHITE));
    }

    #[test]
    fn test_clear_overrides_pending_paint() {
        let mut surface = TiledSurface::new(64, 64, 16, WHITE);
        surface.paint_circle_additive_unrotated(glam::Vec2::new(32.0, 32.0), 25, RED, 2.0, 2.0);

        let region = surface.clear([0.0, 0.0, 1.0, 1.0]);

        assert!(surface.dirty().is_empty());
        assert_eq!(region.size, (64, 64));
        assert_eq!(region.data.len(), 64 * 64 * 4);
        assert!(surface.working().pixels().iter().all(|p| *p == [0.0, 0.0, 1.0, 1.0]));
        assert!(surface.committed().pixels().iter().all(|p| *p == [0.0, 0.0, 1.0, 1.0]));
    }
}
