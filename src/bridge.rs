//! Boundary between the simulation core and whatever draws it.

use log::{debug, info};

use crate::error::Result;
use crate::surface::SurfaceGrid;

/// Receives surface data from the simulation loop
///
/// Implementations own drawing, camera and controls. The loop makes no
/// assumption about when submitted data becomes visible.
pub trait RenderBridge {
    /// Static line-list topology, sent once when the loop starts
    fn submit_wireframe_edges(&mut self, indices: &[u32]) -> Result<()>;

    /// Full grid with fresh heights, sent once per tick
    fn submit_surface(&mut self, grid: &SurfaceGrid) -> Result<()>;

    /// Source marker positions (x, y, bobbing z), sent once per tick
    fn submit_sources(&mut self, _markers: &[[f64; 3]; 2]) -> Result<()> {
        Ok(())
    }
}

/// Headless bridge: logs surface statistics instead of drawing
pub struct LogBridge {
    /// Emit an info line every this many frames (0 = never)
    report_every: u64,
    frames: u64,
    edge_count: usize,
}

impl LogBridge {
    pub fn new(report_every: u64) -> Self {
        Self {
            report_every,
            frames: 0,
            edge_count: 0,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl RenderBridge for LogBridge {
    fn submit_wireframe_edges(&mut self, indices: &[u32]) -> Result<()> {
        self.edge_count = indices.len() / 2;
        info!("Wireframe topology: {} edges", self.edge_count);
        Ok(())
    }

    fn submit_surface(&mut self, grid: &SurfaceGrid) -> Result<()> {
        self.frames += 1;
        let (lo, hi) = grid.height_range();
        debug!("Frame {}: z ∈ [{:.3}, {:.3}]", self.frames, lo, hi);

        if self.report_every > 0 && self.frames % self.report_every == 0 {
            info!(
                "Frame {}: {} points, z ∈ [{:.3}, {:.3}]",
                self.frames,
                grid.points().len(),
                lo,
                hi
            );
        }
        Ok(())
    }

    fn submit_sources(&mut self, markers: &[[f64; 3]; 2]) -> Result<()> {
        debug!(
            "Sources: z1 = {:.3}, z2 = {:.3}",
            markers[0][2], markers[1][2]
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::SurfaceDomain;

    #[test]
    fn test_log_bridge_counts_frames() {
        let grid = SurfaceGrid::create(SurfaceDomain::default()).unwrap();
        let mut bridge = LogBridge::new(2);

        bridge
            .submit_wireframe_edges(&grid.wireframe_indices())
            .unwrap();
        assert_eq!(bridge.edge_count, grid.edge_count());

        for _ in 0..3 {
            bridge.submit_surface(&grid).unwrap();
        }
        assert_eq!(bridge.frames(), 3);
    }
}
