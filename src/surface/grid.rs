//! Fixed-topology sample lattice with cached source distances.

use glam::DVec2;

use super::sources::SourcePair;
use crate::error::Result;
use crate::field::WaveField;
use crate::params::SurfaceDomain;

/// One sample of the height field
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GridPoint {
    pub x: f64,
    pub y: f64,
    /// Height, recomputed every tick
    pub z: f64,
    /// Distance to source 1, fixed until the sources move
    pub r1: f64,
    /// Distance to source 2, fixed until the sources move
    pub r2: f64,
}

/// Row-major lattice: rows run along y, columns along x.
///
/// Dimensions and (x, y) are fixed at creation. Only the heights and the
/// distance caches change afterwards.
#[derive(Clone, Debug)]
pub struct SurfaceGrid {
    domain: SurfaceDomain,
    rows: usize,
    cols: usize,
    points: Vec<GridPoint>,
}

impl SurfaceGrid {
    /// Allocate the lattice for `domain`; point (row, col) sits exactly at
    /// `(x_min + col·dx, y_min + row·dy)`.
    pub fn create(domain: SurfaceDomain) -> Result<Self> {
        domain.validate()?;

        let rows = domain.rows();
        let cols = domain.cols();
        let mut points = Vec::with_capacity(rows * cols);

        for row in 0..rows {
            let y = domain.y_min + row as f64 * domain.dy;
            for col in 0..cols {
                let x = domain.x_min + col as f64 * domain.dx;
                points.push(GridPoint {
                    x,
                    y,
                    ..GridPoint::default()
                });
            }
        }

        Ok(Self {
            domain,
            rows,
            cols,
            points,
        })
    }

    /// Cache each point's distance to both sources and flatten the surface
    pub fn initialize(&mut self, sources: &SourcePair) {
        for point in &mut self.points {
            let xy = DVec2::new(point.x, point.y);
            point.r1 = xy.distance(sources.source1);
            point.r2 = xy.distance(sources.source2);
            point.z = 0.0;
        }
    }

    /// Recompute every height from the cached distances at time `t_s`
    pub fn update_heights(&mut self, field: &WaveField<'_>, t_s: f64) {
        for point in &mut self.points {
            point.z = field.evaluate(point.r1, point.r2, t_s);
        }
    }

    pub fn domain(&self) -> &SurfaceDomain {
        &self.domain
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn points(&self) -> &[GridPoint] {
        &self.points
    }

    pub fn index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    pub fn point(&self, row: usize, col: usize) -> Option<&GridPoint> {
        if row < self.rows && col < self.cols {
            self.points.get(self.index(row, col))
        } else {
            None
        }
    }

    /// Adjacent index pairs: every row's horizontal links, then every
    /// column's vertical links. No diagonals, no wraparound.
    ///
    /// Lazy and restartable: each call yields the full sequence again.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let (rows, cols) = (self.rows, self.cols);

        let horizontal = (0..rows).flat_map(move |row| {
            (1..cols).map(move |col| (row * cols + col - 1, row * cols + col))
        });
        let vertical = (1..rows).flat_map(move |row| {
            (0..cols).map(move |col| ((row - 1) * cols + col, row * cols + col))
        });

        horizontal.chain(vertical)
    }

    /// Visit both endpoints of every edge
    pub fn for_each_edge<F>(&self, mut visitor: F)
    where
        F: FnMut(&GridPoint, &GridPoint),
    {
        for (a, b) in self.edges() {
            visitor(&self.points[a], &self.points[b]);
        }
    }

    pub fn edge_count(&self) -> usize {
        (self.rows - 1) * self.cols + self.rows * (self.cols - 1)
    }

    /// Edges flattened into a line-list index buffer
    pub fn wireframe_indices(&self) -> Vec<u32> {
        let mut indices = Vec::with_capacity(self.edge_count() * 2);
        for (a, b) in self.edges() {
            indices.push(a as u32);
            indices.push(b as u32);
        }
        indices
    }

    /// Lowest and highest current height
    pub fn height_range(&self) -> (f64, f64) {
        self.points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.z), hi.max(p.z))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::params::{ParameterField, WaveParameters};
    use crate::surface::SourceGeometry;
    use approx::{assert_abs_diff_eq, assert_relative_eq};

    fn default_grid() -> SurfaceGrid {
        SurfaceGrid::create(SurfaceDomain::default()).unwrap()
    }

    #[test]
    fn test_grid_creation() {
        let grid = default_grid();
        assert_eq!(grid.rows(), 41);
        assert_eq!(grid.cols(), 41);
        assert_eq!(grid.points().len(), 41 * 41);

        for row in 0..grid.rows() {
            for col in 0..grid.cols() {
                let p = grid.point(row, col).unwrap();
                assert_eq!(p.x, -200.0 + col as f64 * 10.0);
                assert_eq!(p.y, -200.0 + row as f64 * 10.0);
                assert_eq!(p.z, 0.0);
            }
        }
        assert!(grid.point(41, 0).is_none());
    }

    #[test]
    fn test_uneven_domain_dimensions() {
        let domain = SurfaceDomain {
            x_min: -5.0,
            x_max: 12.0,
            y_min: 0.0,
            y_max: 30.0,
            dx: 4.0,
            dy: 7.5,
        };
        let grid = SurfaceGrid::create(domain).unwrap();
        // ⌈17/4⌉ + 1 = 6, 30/7.5 + 1 = 5
        assert_eq!(grid.cols(), 6);
        assert_eq!(grid.rows(), 5);
        assert_eq!(grid.point(4, 5).unwrap().x, 15.0);
        assert_eq!(grid.point(4, 5).unwrap().y, 30.0);
    }

    #[test]
    fn test_invalid_domain() {
        let domain = SurfaceDomain {
            dx: 0.0,
            ..SurfaceDomain::default()
        };
        assert!(matches!(
            SurfaceGrid::create(domain),
            Err(Error::InvalidDomain(_))
        ));
    }

    #[test]
    fn test_degenerate_step_fails_instead_of_allocating() {
        let domain = SurfaceDomain::default().with_step(1e-300);
        assert!(matches!(
            SurfaceGrid::create(domain),
            Err(Error::InvalidDomain(_))
        ));
    }

    #[test]
    fn test_initialize_caches_distances() {
        let mut grid = default_grid();
        let geometry = SourceGeometry::new(10.0, -200.0);
        grid.initialize(&geometry.sources());

        // Centre point (0, 0)
        let centre = grid.point(20, 20).unwrap();
        assert_eq!((centre.x, centre.y), (0.0, 0.0));
        let expected = (5.0_f64 * 5.0 + 200.0 * 200.0).sqrt();
        assert_relative_eq!(centre.r1, expected);
        assert_relative_eq!(centre.r2, expected);
        assert_abs_diff_eq!(centre.r1, 200.0624, epsilon = 1e-4);

        // Corner (-200, -200): 195 from source 1, 205 from source 2
        let corner = grid.point(0, 0).unwrap();
        assert_relative_eq!(corner.r1, 195.0);
        assert_relative_eq!(corner.r2, 205.0);
    }

    #[test]
    fn test_update_heights_matches_formula() {
        let mut params = WaveParameters::default();
        params.set(ParameterField::PhaseOffset, 30.0);
        params.set(ParameterField::Amplitude2, 4.0);
        let mut grid = default_grid();
        grid.initialize(&SourceGeometry::new(60.0, -200.0).sources());

        grid.update_heights(&WaveField::new(&params), 0.0);

        let k = params.angular_wavenumber();
        for p in grid.points() {
            let expected = params.amplitude1() * (-p.r1 / k).sin()
                + params.amplitude2() * (-(p.r2 - params.phase_offset()) / k).sin();
            assert_abs_diff_eq!(p.z, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_initialize_resets_heights() {
        let params = WaveParameters::default();
        let mut grid = default_grid();
        let sources = SourceGeometry::new(10.0, -200.0).sources();
        grid.initialize(&sources);
        grid.update_heights(&WaveField::new(&params), 0.07);
        assert!(grid.points().iter().any(|p| p.z != 0.0));

        grid.initialize(&sources);
        assert!(grid.points().iter().all(|p| p.z == 0.0));
    }

    #[test]
    fn test_edge_count_and_adjacency() {
        let domain = SurfaceDomain {
            x_min: 0.0,
            x_max: 40.0,
            y_min: 0.0,
            y_max: 20.0,
            dx: 10.0,
            dy: 10.0,
        };
        let grid = SurfaceGrid::create(domain).unwrap();
        let (rows, cols) = (grid.rows(), grid.cols());
        assert_eq!((rows, cols), (3, 5));

        let edges: Vec<_> = grid.edges().collect();
        assert_eq!(edges.len(), (rows - 1) * cols + rows * (cols - 1));
        assert_eq!(edges.len(), grid.edge_count());

        let mut visited = 0;
        grid.for_each_edge(|a, b| {
            let step_x = (b.x - a.x).abs();
            let step_y = (b.y - a.y).abs();
            assert!(
                (step_x == 10.0 && step_y == 0.0) || (step_x == 0.0 && step_y == 10.0),
                "non-adjacent edge {:?} → {:?}",
                a,
                b
            );
            visited += 1;
        });
        assert_eq!(visited, edges.len());

        // Restartable
        assert_eq!(grid.edges().count(), edges.len());
    }

    #[test]
    fn test_single_row_and_single_point_grids() {
        let line = SurfaceGrid::create(SurfaceDomain {
            x_min: 0.0,
            x_max: 30.0,
            y_min: 5.0,
            y_max: 5.0,
            dx: 10.0,
            dy: 10.0,
        })
        .unwrap();
        assert_eq!((line.rows(), line.cols()), (1, 4));
        assert_eq!(line.edges().count(), 3);

        let dot = SurfaceGrid::create(SurfaceDomain {
            x_min: 1.0,
            x_max: 1.0,
            y_min: 1.0,
            y_max: 1.0,
            dx: 1.0,
            dy: 1.0,
        })
        .unwrap();
        assert_eq!(dot.points().len(), 1);
        assert_eq!(dot.edges().count(), 0);
        assert!(dot.wireframe_indices().is_empty());
    }

    #[test]
    fn test_wireframe_indices_pair_up_edges() {
        let grid = default_grid();
        let indices = grid.wireframe_indices();
        assert_eq!(indices.len(), grid.edge_count() * 2);
        assert_eq!(&indices[..2], &[0, 1]);
        assert!(indices.iter().all(|&i| (i as usize) < grid.points().len()));
    }
}
