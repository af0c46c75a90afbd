//! Colour gradient evaluated by the brush as it travels across the canvas

use serde::{Deserialize, Serialize};

/// A colour stop at a normalized position along the gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Position in 0..=1
    pub position: f32,
    /// Straight-alpha RGBA colour
    pub color: [f32; 4],
}

/// Piecewise-linear colour gradient.
///
/// Stops are kept sorted by position. Phases before the first stop or after
/// the last stop evaluate to that stop's colour. Serialized as the bare
/// list of stops; deserializing sorts them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<GradientStop>", into = "Vec<GradientStop>")]
pub struct ColorGradient {
    stops: Vec<GradientStop>,
}

impl Default for ColorGradient {
    fn default() -> Self {
        Self::new(vec![
            GradientStop { position: 0.0, color: [0.91, 0.26, 0.21, 1.0] },
            GradientStop { position: 0.33, color: [0.98, 0.75, 0.18, 1.0] },
            GradientStop { position: 0.66, color: [0.20, 0.66, 0.33, 1.0] },
            GradientStop { position: 1.0, color: [0.91, 0.26, 0.21, 1.0] },
        ])
    }
}

impl From<Vec<GradientStop>> for ColorGradient {
    fn from(stops: Vec<GradientStop>) -> Self {
        Self::new(stops)
    }
}

impl From<ColorGradient> for Vec<GradientStop> {
    fn from(gradient: ColorGradient) -> Self {
        gradient.stops
    }
}

impl ColorGradient {
    /// Build a gradient from stops in any order.
    pub fn new(mut stops: Vec<GradientStop>) -> Self {
        stops.sort_by(|a, b| a.position.total_cmp(&b.position));
        Self { stops }
    }

    /// A gradient that always evaluates to `color`.
    pub fn solid(color: [f32; 4]) -> Self {
        Self::new(vec![GradientStop { position: 0.0, color }])
    }

    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }

    /// Evaluate the gradient at `phase`.
    ///
    /// An empty gradient evaluates to opaque white.
    pub fn evaluate(&self, phase: f32) -> [f32; 4] {
        let (Some(first), Some(last)) = (self.stops.first(), self.stops.last()) else {
            return [1.0, 1.0, 1.0, 1.0];
        };
        if !phase.is_finite() || phase <= first.position {
            return first.color;
        }
        if phase >= last.position {
            return last.color;
        }

        for pair in self.stops.windows(2) {
            let (lo, hi) = (pair[0], pair[1]);
            if phase <= hi.position {
                let span = hi.position - lo.position;
                if span <= f32::EPSILON {
                    return hi.color;
                }
                let t = (phase - lo.position) / span;
                return [
                    lo.color[0] + (hi.color[0] - lo.color[0]) * t,
                    lo.color[1] + (hi.color[1] - lo.color[1]) * t,
                    lo.color[2] + (hi.color[2] - lo.color[2]) * t,
                    lo.color[3] + (hi.color[3] - lo.color[3]) * t,
                ];
            }
        }

        last.color
    }
}
