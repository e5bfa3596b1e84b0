//! Surface domain and simulation loop configuration.

use std::time::Duration;

use crate::error::{Error, Result};

/// Largest lattice a domain may describe; keeps every vertex index within `u32`
pub const MAX_GRID_POINTS: usize = 1 << 22;

/// Rectangular sampling domain of the height field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceDomain {
    /// Left edge (world units)
    pub x_min: f64,

    /// Right edge (world units)
    pub x_max: f64,

    /// Near edge (world units); also the baseline the sources sit on
    pub y_min: f64,

    /// Far edge (world units)
    pub y_max: f64,

    /// Lattice step along x (world units)
    pub dx: f64,

    /// Lattice step along y (world units)
    pub dy: f64,
}

impl Default for SurfaceDomain {
    fn default() -> Self {
        Self {
            x_min: -200.0,
            x_max: 200.0,
            y_min: -200.0,
            y_max: 200.0,
            dx: 10.0,
            dy: 10.0,
        }
    }
}

impl SurfaceDomain {
    /// Same bounds, uniform step in both directions
    pub fn with_step(mut self, step: f64) -> Self {
        self.dx = step;
        self.dy = step;
        self
    }

    /// Reject bounds and steps that cannot produce a lattice
    pub fn validate(&self) -> Result<()> {
        let values = [self.x_min, self.x_max, self.y_min, self.y_max, self.dx, self.dy];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidDomain(format!(
                "bounds and steps must be finite, got {:?}",
                self
            )));
        }
        if self.dx <= 0.0 || self.dy <= 0.0 {
            return Err(Error::InvalidDomain(format!(
                "steps must be > 0, got dx = {}, dy = {}",
                self.dx, self.dy
            )));
        }
        if self.x_min > self.x_max || self.y_min > self.y_max {
            return Err(Error::InvalidDomain(format!(
                "empty range x [{}, {}], y [{}, {}]",
                self.x_min, self.x_max, self.y_min, self.y_max
            )));
        }

        let points = sample_count(self.x_max - self.x_min, self.dx)
            * sample_count(self.y_max - self.y_min, self.dy);
        if points > MAX_GRID_POINTS as f64 {
            return Err(Error::InvalidDomain(format!(
                "{:.3e} points exceeds the limit of {}",
                points, MAX_GRID_POINTS
            )));
        }
        Ok(())
    }

    /// Number of lattice columns (samples along x); exact once validated
    pub fn cols(&self) -> usize {
        sample_count(self.x_max - self.x_min, self.dx) as usize
    }

    /// Number of lattice rows (samples along y); exact once validated
    pub fn rows(&self) -> usize {
        sample_count(self.y_max - self.y_min, self.dy) as usize
    }
}

/// ⌈span / step⌉ + 1, tolerant of float noise on exact multiples
///
/// Kept in `f64` so an absurd step saturates instead of overflowing.
fn sample_count(span: f64, step: f64) -> f64 {
    let steps = span / step;
    let rounded = steps.round();
    let steps = if (steps - rounded).abs() < 1e-9 {
        rounded
    } else {
        steps.ceil()
    };
    steps + 1.0
}

/// Timing of the simulation loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopConfig {
    /// Simulated time added per tick (seconds)
    pub dt_s: f64,

    /// Wall-clock pause between ticks (approximate frame pacing)
    pub wait: Duration,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            dt_s: 0.01,
            wait: Duration::from_millis(15),
        }
    }
}
