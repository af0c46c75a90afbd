//! Path tracing core for brushtrail.
//!
//! This crate models the path the player traces and rates how well they
//! trace it:
//! - **Curve**: anchor/handle control points, sampling and arc lengths
//! - **Sample**: dense polyline with cumulative distances and block bounds
//! - **Tracker**: drag gestures to monotonic progress, completion signal
//! - **Scorer**: hard (painted point distance) and light (drag alignment)
//!   accuracy modes on the fixed tick
//! - **Search**: windowed nearest-point lookup with exhaustive fallback
//! - **Session**: match-layer facade that wires tracker and scorer together

pub mod curve;
pub mod error;
pub mod sample;
pub mod scorer;
pub mod search;
pub mod session;
pub mod tracker;

pub use curve::{CurveModel, DIRECTION_EPSILON};
pub use error::PathError;
pub use sample::{PathSample, SampleBlock, SAMPLE_BLOCK_SIZE};
pub use scorer::{AccuracyScorer, ScoreEvent, ScoreMode, ScoreTick};
pub use search::{exhaustive_nearest, NearestHit, NearestPointSearch};
pub use session::{SessionEvent, TraceSession};
pub use tracker::{Fade, PathPolyline, ProgressTracker, TrackerEvent};
