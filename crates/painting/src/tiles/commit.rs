//! Committing dirty tiles from the working buffer to the committed buffer

use tracing::debug;

use super::{TileCoord, TiledSurface};

/// Region committed by `apply_paint`, ready for texture upload
#[derive(Debug, Clone, PartialEq)]
pub struct DirtyRegion {
    /// Pixel offset in texture (x, y)
    pub offset: (u32, u32),
    /// Region dimensions (width, height)
    pub size: (u32, u32),
    /// RGBA8 pixel data (row-major)
    pub data: Vec<u8>,
}

impl TiledSurface {
    /// Get tile bounds (x, y, width, height) in pixel coordinates
    pub fn get_tile_bounds(&self, coord: TileCoord) -> (u32, u32, u32, u32) {
        let tile_start_x = coord.x * self.tile_size;
        let tile_start_y = coord.y * self.tile_size;

        // Edge tiles may be smaller than the tile size
        let tile_width = self.tile_size.min(self.width().saturating_sub(tile_start_x));
        let tile_height = self.tile_size.min(self.height().saturating_sub(tile_start_y));

        (tile_start_x, tile_start_y, tile_width, tile_height)
    }

    /// Commit every pending stamp.
    ///
    /// Dirty tiles are copied from the working buffer into the committed
    /// buffer and returned as upload regions. Calling this with nothing
    /// pending is a no-op returning an empty list.
    pub fn apply_paint(&mut self) -> Vec<DirtyRegion> {
        let tiles = self.dirty.drain();
        if tiles.is_empty() {
            return Vec::new();
        }

        let mut regions = Vec::with_capacity(tiles.len());
        for tile in tiles {
            let (x, y, w, h) = self.get_tile_bounds(tile);
            if w == 0 || h == 0 {
                continue;
            }
            self.committed.copy_region_from(&self.working, x, y, w, h);
            regions.push(DirtyRegion {
                offset: (x, y),
                size: (w, h),
                data: self.committed.region_rgba8(x, y, w, h),
            });
        }

        debug!("apply_paint: committed {} tiles", regions.len());
        regions
    }
}
