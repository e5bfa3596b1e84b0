//! End-to-end ticking of the ripple tank through a recording bridge.

use std::time::Duration;

use approx::assert_abs_diff_eq;
use ripple_tank::bridge::RenderBridge;
use ripple_tank::params::{LoopConfig, ParameterField, SurfaceDomain, WaveParameters};
use ripple_tank::simulation::{LoopState, ManualTimer, SimulationLoop};
use ripple_tank::surface::{RippleTank, SurfaceGrid};
use ripple_tank::Result;

/// Keeps a copy of everything it is handed
#[derive(Default)]
struct RecordingBridge {
    edges: Vec<u32>,
    frames: Vec<Vec<[f64; 3]>>,
    markers: Vec<[[f64; 3]; 2]>,
}

impl RenderBridge for RecordingBridge {
    fn submit_wireframe_edges(&mut self, indices: &[u32]) -> Result<()> {
        self.edges = indices.to_vec();
        Ok(())
    }

    fn submit_surface(&mut self, grid: &SurfaceGrid) -> Result<()> {
        self.frames
            .push(grid.points().iter().map(|p| [p.x, p.y, p.z]).collect());
        Ok(())
    }

    fn submit_sources(&mut self, markers: &[[f64; 3]; 2]) -> Result<()> {
        self.markers.push(*markers);
        Ok(())
    }
}

fn new_loop(
    params: WaveParameters,
    timer: &ManualTimer,
) -> SimulationLoop<ManualTimer, RecordingBridge> {
    let config = LoopConfig::default();
    let tank = RippleTank::new(params, SurfaceDomain::default(), &config).unwrap();
    SimulationLoop::new(tank, RecordingBridge::default(), timer.clone(), &config)
}

/// Poll once per wait interval for `n` ticks
fn run_ticks(
    sim: &mut SimulationLoop<ManualTimer, RecordingBridge>,
    timer: &ManualTimer,
    n: usize,
) {
    for _ in 0..n {
        assert!(sim.poll());
        timer.advance(Duration::from_millis(15));
    }
}

fn distances(sim: &SimulationLoop<ManualTimer, RecordingBridge>) -> Vec<(f64, f64)> {
    sim.tank()
        .grid()
        .points()
        .iter()
        .map(|p| (p.r1, p.r2))
        .collect()
}

#[test]
fn first_frame_matches_formula_at_time_zero() {
    let timer = ManualTimer::new();
    let mut sim = new_loop(WaveParameters::default(), &timer);
    sim.start();
    run_ticks(&mut sim, &timer, 1);

    let params = sim.tank().params().clone();
    let grid = sim.tank().grid();
    let frame = &sim.bridge().frames[0];
    let k = params.angular_wavenumber();

    for (submitted, point) in frame.iter().zip(grid.points()) {
        let expected = params.amplitude1() * (-point.r1 / k).sin()
            + params.amplitude2() * (-(point.r2 - params.phase_offset()) / k).sin();
        assert_abs_diff_eq!(submitted[2], expected, epsilon = 1e-12);
        assert_eq!((submitted[0], submitted[1]), (point.x, point.y));
    }
}

#[test]
fn topology_is_sent_once_and_frames_every_tick() {
    let timer = ManualTimer::new();
    let mut sim = new_loop(WaveParameters::default(), &timer);
    sim.start();
    sim.start(); // already running: no second topology submission or extra tick
    run_ticks(&mut sim, &timer, 10);

    let grid = sim.tank().grid();
    assert_eq!(sim.bridge().edges.len(), grid.edge_count() * 2);
    assert_eq!(sim.bridge().frames.len(), 10);
    assert_eq!(sim.bridge().markers.len(), 10);
    assert!(sim.bridge().frames.iter().all(|f| f.len() == 41 * 41));
}

#[test]
fn simulated_time_wraps_at_period() {
    let timer = ManualTimer::new();
    let mut sim = new_loop(WaveParameters::default(), &timer);
    sim.start();
    run_ticks(&mut sim, &timer, 60);

    // 60 · 0.01 = 0.6 s; period 0.25 s
    assert_abs_diff_eq!(sim.tank().time(), 0.1, epsilon = 1e-9);
    assert_eq!(sim.ticks(), 60);
}

#[test]
fn separation_change_is_serialized_between_ticks() {
    let timer = ManualTimer::new();
    let mut sim = new_loop(WaveParameters::default(), &timer);
    sim.start();
    run_ticks(&mut sim, &timer, 1);

    let before = distances(&sim);
    sim.parameters().push(ParameterField::SourceSeparation, 400.0);

    // Still the old geometry until the next tick runs
    assert_eq!(sim.tank().sources().source1.x, -5.0);

    run_ticks(&mut sim, &timer, 1);
    let after = distances(&sim);

    assert_ne!(before, after);
    assert_eq!(sim.tank().sources().source1.x, -200.0);
    assert_eq!(sim.bridge().markers[1][1][0], 200.0);

    // Corner (-200, -200) now sits on source 1
    let corner = sim.tank().grid().point(0, 0).unwrap();
    assert_abs_diff_eq!(corner.r1, 0.0);
    assert_abs_diff_eq!(corner.r2, 400.0);
}

#[test]
fn stopped_loop_stays_quiet() {
    let timer = ManualTimer::new();
    let mut sim = new_loop(WaveParameters::default(), &timer);
    sim.start();
    run_ticks(&mut sim, &timer, 3);
    sim.stop();
    assert_eq!(sim.state(), LoopState::Idle);

    for _ in 0..5 {
        timer.advance(Duration::from_millis(15));
        assert!(!sim.poll());
    }
    assert_eq!(sim.bridge().frames.len(), 3);
}
