//! Ripple tank model: parameters, sources, grid and clock kept consistent.

use log::info;

use super::grid::SurfaceGrid;
use super::sources::{SourceGeometry, SourcePair};
use crate::clock::SimulationClock;
use crate::error::Result;
use crate::field::{SourceMotion, WaveField};
use crate::params::{LoopConfig, ParameterField, SurfaceDomain, WaveParameters};

/// A requested change to one wave parameter
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParameterChange {
    pub field: ParameterField,
    pub value: f64,
}

impl ParameterChange {
    pub fn new(field: ParameterField, value: f64) -> Self {
        Self { field, value }
    }
}

/// Owns everything the height field depends on
///
/// All mutation goes through [`apply`](RippleTank::apply), which keeps the
/// grid's distance caches in step with the source positions.
pub struct RippleTank {
    params: WaveParameters,
    geometry: SourceGeometry,
    grid: SurfaceGrid,
    clock: SimulationClock,
}

impl RippleTank {
    /// Build the grid for `domain` with the sources on its near edge
    pub fn new(
        params: WaveParameters,
        domain: SurfaceDomain,
        config: &LoopConfig,
    ) -> Result<Self> {
        let clock = SimulationClock::new(config.dt_s)?;
        let mut grid = SurfaceGrid::create(domain)?;
        let geometry = SourceGeometry::new(params.source_separation(), domain.y_min);
        grid.initialize(&geometry.sources());

        info!(
            "Surface grid {}x{} ({} points, {} edges)",
            grid.cols(),
            grid.rows(),
            grid.points().len(),
            grid.edge_count()
        );

        Ok(Self {
            params,
            geometry,
            grid,
            clock,
        })
    }

    pub fn params(&self) -> &WaveParameters {
        &self.params
    }

    pub fn grid(&self) -> &SurfaceGrid {
        &self.grid
    }

    pub fn sources(&self) -> SourcePair {
        self.geometry.sources()
    }

    pub fn time(&self) -> f64 {
        self.clock.time()
    }

    /// Apply one parameter change; returns the value actually stored
    pub fn apply(&mut self, change: ParameterChange) -> f64 {
        let previous = self.params.get(change.field);
        let value = self.params.set(change.field, change.value);

        if change.field == ParameterField::SourceSeparation && value != previous {
            self.apply_source_separation();
        }
        if value != previous {
            info!("{} {} → {}", change.field, previous, value);
        }
        value
    }

    /// Move the sources to the current separation and rebuild distance caches
    fn apply_source_separation(&mut self) {
        let sources = self.geometry.recompute(self.params.source_separation());
        self.grid.initialize(&sources);
    }

    /// Recompute every height at the current simulated time
    pub fn update_heights(&mut self) {
        let field = WaveField::new(&self.params);
        self.grid.update_heights(&field, self.clock.time());
    }

    /// Source marker bobbing at the current simulated time
    pub fn source_motion(&self) -> SourceMotion {
        WaveField::new(&self.params).source_motion(self.clock.time())
    }

    /// Source marker positions including their vertical bobbing
    pub fn source_markers(&self) -> [[f64; 3]; 2] {
        let pair = self.sources();
        let motion = self.source_motion();
        [
            [pair.source1.x, pair.source1.y, motion.z1],
            [pair.source2.x, pair.source2.y, motion.z2],
        ]
    }

    /// Step simulated time, wrapping at the current period
    pub fn advance_clock(&mut self) -> f64 {
        self.clock.tick(self.params.frequency_hz())
    }
}
