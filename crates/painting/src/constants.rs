/// Default tile size for dirty tracking and batched commits.
pub const DEFAULT_TILE_SIZE: u32 = 128;

/// Largest canvas edge accepted by `initialize`. Not a magic number - may change.
pub const MAX_CANVAS_SIZE: u32 = 4096;

/// Positions closer than this are treated as the same paint point.
pub const SAME_POINT_EPSILON: f32 = 1e-5;
