//! Path generation and placement onto the canvas
//!
//! Paths are zig-zags built in unit space, rotated by a multiple of 45
//! degrees, optionally mirrored, then fitted inside the surface corners.
//! Generation is a one-shot task that completes after a fixed number of
//! frames. Only one generation is in flight at a time: a request made while
//! one is running waits for it to finish and then starts over.

use bevy::prelude::*;
use glam::{Vec2, Vec3};
use painting::SurfaceCorners;
use tracing::debug;

/// Fraction of the canvas left free around a placed path
const PLACEMENT_MARGIN: f32 = 0.1;

/// splitmix64 step
fn next_random(state: &mut u64) -> u64 {
    *state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = *state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Placement randomisation derived from one seed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub segments: usize,
    /// Rotation in multiples of 45 degrees
    pub rotation_steps: u32,
    pub flip_x: bool,
    pub flip_y: bool,
    /// Sign of the first handle's sideways bulge
    pub bulge: f32,
}

impl Placement {
    pub fn from_seed(seed: u64) -> Self {
        let mut state = seed;
        let choice = next_random(&mut state);
        Self {
            segments: 2 + (choice % 3) as usize,
            rotation_steps: ((choice >> 8) % 8) as u32,
            flip_x: (choice >> 16) & 1 == 1,
            flip_y: (choice >> 17) & 1 == 1,
            bulge: if (choice >> 18) & 1 == 1 { 1.0 } else { -1.0 },
        }
    }
}

/// Zig-zag control points in unit space, centered on (0, 0)
fn unit_zigzag(placement: &Placement) -> Vec<Vec2> {
    let segments = placement.segments.max(1);
    let anchor = |k: usize| {
        let x = k as f32 / segments as f32 - 0.5;
        let y = if k % 2 == 0 { -0.2 } else { 0.2 };
        Vec2::new(x, y)
    };

    let mut points = Vec::with_capacity(segments * 2 + 1);
    for k in 0..segments {
        let (start, end) = (anchor(k), anchor(k + 1));
        let chord = end - start;
        let side = Vec2::new(-chord.y, chord.x).normalize_or_zero();
        let sign = if k % 2 == 0 { placement.bulge } else { -placement.bulge };
        points.push(start);
        points.push((start + end) * 0.5 + side * 0.08 * sign);
    }
    points.push(anchor(segments));
    points
}

/// Build control points for `placement`, fitted inside `corners`
pub fn build_control_points(placement: &Placement, corners: &SurfaceCorners) -> Vec<Vec3> {
    let rotation = Vec2::from_angle(placement.rotation_steps as f32 * std::f32::consts::FRAC_PI_4);
    let transformed: Vec<Vec2> = unit_zigzag(placement)
        .into_iter()
        .map(|p| {
            let p = rotation.rotate(p);
            Vec2::new(
                if placement.flip_x { -p.x } else { p.x },
                if placement.flip_y { -p.y } else { p.y },
            )
        })
        .collect();

    let extent = transformed
        .iter()
        .map(|p| p.x.abs().max(p.y.abs()))
        .fold(0.0_f32, f32::max);
    let scale = if extent > 0.0 { (0.5 - PLACEMENT_MARGIN) / extent } else { 1.0 };

    transformed
        .into_iter()
        .map(|p| {
            let uv = Vec2::splat(0.5) + p * scale;
            corners.left_low() + corners.width_axis() * uv.x + corners.height_axis() * uv.y
        })
        .collect()
}

struct Generation {
    frames_left: u32,
    control_points: Vec<Vec3>,
}

#[derive(Resource)]
pub struct PathGenerator {
    seed: u64,
    counter: u64,
    frames_per_generation: u32,
    in_flight: Option<Generation>,
    /// A request arrived while a generation was running
    queued: bool,
}

impl PathGenerator {
    pub fn new(seed: u64, frames_per_generation: u32) -> Self {
        Self {
            seed,
            counter: 0,
            frames_per_generation: frames_per_generation.max(1),
            in_flight: None,
            queued: false,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn generated(&self) -> u64 {
        self.counter
    }

    /// Ask for a new path; waits for any in-flight generation first
    pub fn request(&mut self, corners: &SurfaceCorners) {
        if self.in_flight.is_some() {
            debug!("PathGenerator: generation in flight, request queued");
            self.queued = true;
            return;
        }
        self.start(corners);
    }

    fn start(&mut self, corners: &SurfaceCorners) {
        let placement = Placement::from_seed(self.seed.wrapping_add(self.counter));
        self.counter += 1;
        debug!("PathGenerator: generating {:?}", placement);
        self.in_flight = Some(Generation {
            frames_left: self.frames_per_generation,
            control_points: build_control_points(&placement, corners),
        });
    }

    /// Advance one frame; returns control points when a generation completes
    pub fn tick(&mut self, corners: &SurfaceCorners) -> Option<Vec<Vec3>> {
        let generation = self.in_flight.as_mut()?;
        generation.frames_left = generation.frames_left.saturating_sub(1);
        if generation.frames_left > 0 {
            return None;
        }

        let finished = self.in_flight.take()?;
        if self.queued {
            self.queued = false;
            self.start(corners);
        }
        Some(finished.control_points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corners() -> SurfaceCorners {
        SurfaceCorners::xy_rect(Vec2::new(-1.0, -1.0), Vec2::new(1.0, 1.0), 0.0)
    }

    #[test]
    fn test_control_points_fit_inside_surface() {
        for seed in 0..32 {
            let placement = Placement::from_seed(seed);
            let points = build_control_points(&placement, &corners());
            assert_eq!(points.len(), placement.segments * 2 + 1);
            for p in points {
                assert!(p.x.abs() <= 0.81 && p.y.abs() <= 0.81, "{p:?}");
                assert_eq!(p.z, 0.0);
            }
        }
    }

    #[test]
    fn test_placement_is_deterministic() {
        assert_eq!(Placement::from_seed(42), Placement::from_seed(42));
        let placement = Placement::from_seed(7);
        assert!((2..=4).contains(&placement.segments));
        assert!(placement.rotation_steps < 8);
    }

    #[test]
    fn test_generation_completes_after_frames() {
        let mut generator = PathGenerator::new(1, 3);
        generator.request(&corners());
        assert!(generator.tick(&corners()).is_none());
        assert!(generator.tick(&corners()).is_none());
        assert!(generator.tick(&corners()).is_some());
        assert!(!generator.is_in_flight());
    }

    #[test]
    fn test_request_in_flight_waits_for_completion() {
        let mut generator = PathGenerator::new(1, 2);
        generator.request(&corners());
        generator.request(&corners());
        assert_eq!(generator.generated(), 1);

        assert!(generator.tick(&corners()).is_none());
        assert!(generator.tick(&corners()).is_some());
        // The queued request starts only now
        assert_eq!(generator.generated(), 2);
        assert!(generator.is_in_flight());

        assert!(generator.tick(&corners()).is_none());
        assert!(generator.tick(&corners()).is_some());
        assert!(!generator.is_in_flight());
    }
}
