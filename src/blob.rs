// Blob geometry: a circle of `segments` vertices, each pushed in/out by a
// fixed random amount plus a slow sine wobble.
// Visual: a soft, breathing organic shape centered on the window.

use crate::config::Config;
use crate::rng::RandomSource;
use crate::types::Point;
use std::f64::consts::TAU;

/// How far each vertex's angle wobbles (radians).
const ANGLE_WOBBLE: f64 = 0.02;
/// Config speeds are per second, clock is in milliseconds.
const MS_TO_SECONDS: f64 = 0.001;

/// One independently animated blob.
pub struct Blob {
    base_variations: Vec<f64>, // [-1,1], scales `variation`
    angle_offsets: Vec<f64>,   // [0,2π), phase of the angle wobble
    radius_offsets: Vec<f64>,  // [0,2π), phase of the radius wobble
    time_offset: f64,          // ms added to the clock, desyncs blobs
}

impl Blob {
    pub fn new(segments: usize, time_offset: f64, rng: &mut dyn RandomSource) -> Self {
        let mut blob = Self {
            base_variations: Vec::new(),
            angle_offsets: Vec::new(),
            radius_offsets: Vec::new(),
            time_offset,
        };
        blob.resize(segments, rng);
        blob
    }

    /// Throw away all per-segment randomness and draw `segments` fresh values.
    pub fn resize(&mut self, segments: usize, rng: &mut dyn RandomSource) {
        self.base_variations = (0..segments).map(|_| rng.range(-1.0, 1.0)).collect();
        self.angle_offsets = (0..segments).map(|_| rng.range(0.0, TAU)).collect();
        self.radius_offsets = (0..segments).map(|_| rng.range(0.0, TAU)).collect();
    }

    pub fn segments(&self) -> usize {
        self.base_variations.len()
    }

    /// Vertices for this frame, centered on a `width`x`height` surface and
    /// shifted by `shift`. Returns exactly `config.segments` points.
    pub fn points(
        &mut self,
        config: &Config,
        (width, height): (usize, usize),
        time: f64,
        shift: Point,
        rng: &mut dyn RandomSource,
    ) -> Vec<Point> {
        let n = config.segments;
        if self.segments() != n {
            // Normally the panel hook resized us already; this only catches
            // configs changed behind its back.
            tracing::trace!(from = self.segments(), to = n, "implicit blob resize");
            self.resize(n, rng);
        }

        let center = Point::new(width as f64 / 2.0, height as f64 / 2.0);
        let t = (time + self.time_offset) * MS_TO_SECONDS * config.animation_speed;

        (0..n)
            .map(|i| {
                let angle = (i as f64 / n as f64) * TAU
                    + (t + self.angle_offsets[i]).sin() * ANGLE_WOBBLE;
                let radius = config.radius
                    + self.base_variations[i] * config.variation
                    + (t + self.radius_offsets[i]).sin() * config.animation_amount;
                center + Point::new(angle.cos(), angle.sin()) * radius + shift
            })
            .collect()
    }
}
