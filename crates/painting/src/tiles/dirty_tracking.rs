//! Set of tiles touched since the last commit

use std::collections::BTreeSet;

use tracing::trace;

use super::TileCoord;

/// Dirty tiles of a `width` x `height` buffer, kept in row-major order
#[derive(Debug, Clone)]
pub struct DirtyTiles {
    width: u32,
    height: u32,
    tile_size: u32,
    /// Keyed (row, column) so iteration is row-major
    tiles: BTreeSet<(u32, u32)>,
}

impl DirtyTiles {
    pub fn new(width: u32, height: u32, tile_size: u32) -> Self {
        Self { width, height, tile_size: tile_size.max(1), tiles: BTreeSet::new() }
    }

    /// Mark the tile holding pixel (x, y); out-of-bounds pixels are ignored
    pub fn mark_pixel(&mut self, x: u32, y: u32) {
        if x < self.width && y < self.height {
            self.tiles.insert((y / self.tile_size, x / self.tile_size));
        }
    }

    /// Mark every tile overlapping the rectangle, clipped to the buffer
    pub fn mark_rect(&mut self, x: u32, y: u32, w: u32, h: u32) {
        if w == 0 || h == 0 || x >= self.width || y >= self.height {
            return;
        }
        let last_col = (x.saturating_add(w).min(self.width) - 1) / self.tile_size;
        let last_row = (y.saturating_add(h).min(self.height) - 1) / self.tile_size;

        let before = self.tiles.len();
        for row in y / self.tile_size..=last_row {
            for col in x / self.tile_size..=last_col {
                self.tiles.insert((row, col));
            }
        }
        trace!("DirtyTiles: rect {}x{} at ({}, {}) added {} tiles", w, h, x, y, self.tiles.len() - before);
    }

    /// Remove and return all dirty tiles, row-major
    pub fn drain(&mut self) -> Vec<TileCoord> {
        std::mem::take(&mut self.tiles)
            .into_iter()
            .map(|(row, col)| TileCoord { x: col, y: row })
            .collect()
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_pixel_ignores_out_of_bounds() {
        let mut dirty = DirtyTiles::new(100, 100, 32);
        dirty.mark_pixel(100, 5);
        dirty.mark_pixel(5, 200);
        assert!(dirty.is_empty());

        dirty.mark_pixel(99, 99);
        assert_eq!(dirty.drain(), vec![TileCoord { x: 3, y: 3 }]);
    }

    #[test]
    fn test_drain_is_row_major() {
        let mut dirty = DirtyTiles::new(64, 64, 32);
        dirty.mark_rect(0, 0, 64, 64);
        assert_eq!(
            dirty.drain(),
            vec![
                TileCoord { x: 0, y: 0 },
                TileCoord { x: 1, y: 0 },
                TileCoord { x: 0, y: 1 },
                TileCoord { x: 1, y: 1 },
            ]
        );
        assert!(dirty.is_empty());
    }

    #[test]
    fn test_rect_clipped_to_buffer() {
        let mut dirty = DirtyTiles::new(64, 64, 32);
        dirty.mark_rect(40, 40, u32::MAX, u32::MAX);
        assert_eq!(dirty.len(), 1);
    }
}
