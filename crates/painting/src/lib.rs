//! brushtrail painting system - canvas raster and brush
//!
//! This crate provides the paint side of the game core:
//! - [`canvas::RasterPaintSurface`] - Pixel buffer bound to collision geometry
//! - [`surface`] - CPU RGBA surface with straight-alpha blending
//! - [`tiles`] - Working/committed buffers with tiled dirty tracking and stamps
//! - [`raycast`] - Collision queries (Moller-Trumbore mesh collider)
//! - [`brush`] - Brush actuator: motion, lift/land cycle, distance gradient
//! - [`tween`] - Timed interpolation driven by the frame loop
//! - [`validation`] - Surface errors and finite-value checks

pub mod brush;
pub mod canvas;
pub mod constants;
pub mod raycast;
pub mod surface;
pub mod tiles;
pub mod tween;
pub mod types;
pub mod validation;

pub use brush::*;
pub use canvas::*;
pub use constants::*;
pub use raycast::*;
pub use surface::*;
pub use tiles::*;
pub use tween::*;
pub use types::*;
pub use validation::*;
