//! Positions of the two coherent sources.

use glam::DVec2;

/// The two emission points, symmetric about x = 0
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourcePair {
    pub source1: DVec2,
    pub source2: DVec2,
}

/// Places the sources as a pure function of their separation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourceGeometry {
    /// y coordinate shared by both sources (world units)
    baseline_y: f64,
    current: SourcePair,
}

impl SourceGeometry {
    pub fn new(separation: f64, baseline_y: f64) -> Self {
        Self {
            baseline_y,
            current: Self::place(separation, baseline_y),
        }
    }

    pub fn sources(&self) -> SourcePair {
        self.current
    }

    pub fn baseline_y(&self) -> f64 {
        self.baseline_y
    }

    /// Move the sources to ±separation/2 and return the new positions.
    ///
    /// Callers must re-initialize the grid's distance caches with the result
    /// before the next height update.
    pub fn recompute(&mut self, separation: f64) -> SourcePair {
        self.current = Self::place(separation, self.baseline_y);
        self.current
    }

    fn place(separation: f64, baseline_y: f64) -> SourcePair {
        let half = separation / 2.0;
        SourcePair {
            source1: DVec2::new(-half, baseline_y),
            source2: DVec2::new(half, baseline_y),
        }
    }
}
