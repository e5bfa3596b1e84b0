//! Idle/Running loop that ticks the ripple tank and feeds the render bridge.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;

use log::{debug, error, info};

use super::scheduler::{Scheduler, Timer, WallTimer};
use crate::bridge::RenderBridge;
use crate::error::Result;
use crate::params::{LoopConfig, ParameterField};
use crate::surface::{ParameterChange, RippleTank};

/// Loop lifecycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    /// Not ticking (before the first start, or after stop)
    Idle,
    /// A tick is always pending
    Running,
}

/// Parameter changes waiting for the next tick (shared with UI threads)
///
/// Changes are applied between ticks, never during a height update, so the
/// distance caches always match the source positions they were built from.
#[derive(Clone, Debug, Default)]
pub struct ParameterQueue {
    pending: Arc<Mutex<VecDeque<ParameterChange>>>,
}

impl ParameterQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, field: ParameterField, value: f64) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(ParameterChange::new(field, value));
    }

    pub fn len(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Most recently queued value for `field`, if one is still waiting
    pub fn latest(&self, field: ParameterField) -> Option<f64> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .rev()
            .find(|change| change.field == field)
            .map(|change| change.value)
    }

    /// Take every queued change, oldest first
    pub fn drain(&self) -> Vec<ParameterChange> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect()
    }
}

/// Cooperative simulation loop
///
/// Each tick schedules the next one only after finishing, so ticks never
/// overlap. The driver calls [`poll`](SimulationLoop::poll) whenever it wakes
/// up and sleeps for [`next_deadline`](SimulationLoop::next_deadline) in
/// between.
pub struct SimulationLoop<T: Timer, B: RenderBridge> {
    tank: RippleTank,
    bridge: B,
    scheduler: Scheduler<T>,
    queue: ParameterQueue,
    wait: Duration,
    state: LoopState,
    ticks: u64,
    skipped: u64,
}

impl<T: Timer, B: RenderBridge> SimulationLoop<T, B> {
    pub fn new(tank: RippleTank, bridge: B, timer: T, config: &LoopConfig) -> Self {
        Self {
            tank,
            bridge,
            scheduler: Scheduler::new(timer),
            queue: ParameterQueue::new(),
            wait: config.wait,
            state: LoopState::Idle,
            ticks: 0,
            skipped: 0,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn tank(&self) -> &RippleTank {
        &self.tank
    }

    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    pub fn bridge_mut(&mut self) -> &mut B {
        &mut self.bridge
    }

    /// Handle for queueing parameter changes from outside the loop
    pub fn parameters(&self) -> ParameterQueue {
        self.queue.clone()
    }

    /// Completed ticks, including skipped ones
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Ticks whose bridge submission failed
    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Idle → Running: send the static topology, then tick immediately
    pub fn start(&mut self) {
        if self.state == LoopState::Running {
            return;
        }

        let indices = self.tank.grid().wireframe_indices();
        if let Err(err) = self.bridge.submit_wireframe_edges(&indices) {
            error!("Wireframe submission failed: {}", err);
        }

        self.state = LoopState::Running;
        self.scheduler.schedule(Duration::ZERO);
        info!("Simulation running (wait {:?})", self.wait);
    }

    /// Running → Idle: the pending tick is cancelled and never fires
    pub fn stop(&mut self) {
        if self.state == LoopState::Idle {
            return;
        }

        self.scheduler.cancel();
        self.state = LoopState::Idle;
        info!("Simulation stopped after {} ticks", self.ticks);
    }

    pub fn toggle(&mut self) {
        match self.state {
            LoopState::Idle => self.start(),
            LoopState::Running => self.stop(),
        }
    }

    /// Time left before the pending tick, if running
    pub fn next_deadline(&self) -> Option<Duration> {
        match self.state {
            LoopState::Running => self.scheduler.time_until_due(),
            LoopState::Idle => None,
        }
    }

    /// Run the pending tick if it is due; returns whether one ran
    pub fn poll(&mut self) -> bool {
        if self.state != LoopState::Running || !self.scheduler.take_due() {
            return false;
        }

        self.tick();
        self.scheduler.schedule(self.wait);
        true
    }

    fn tick(&mut self) {
        for change in self.queue.drain() {
            self.tank.apply(change);
        }

        self.tank.update_heights();

        if let Err(err) = self.submit() {
            self.skipped += 1;
            error!("Tick {} skipped: {}", self.ticks, err);
        }

        self.tank.advance_clock();
        self.ticks += 1;
    }

    fn submit(&mut self) -> Result<()> {
        self.bridge.submit_surface(self.tank.grid())?;
        self.bridge.submit_sources(&self.tank.source_markers())?;
        Ok(())
    }
}

impl<B: RenderBridge> SimulationLoop<WallTimer, B> {
    /// Drive the loop on this thread until `ticks` more ticks have run
    ///
    /// Starts the loop if idle. Returns early if the loop is stopped.
    pub fn run_for(&mut self, ticks: u64) {
        self.start();

        let target = self.ticks + ticks;
        while self.ticks < target {
            let Some(wait) = self.next_deadline() else {
                break;
            };
            if !wait.is_zero() {
                thread::sleep(wait);
            }
            self.poll();
        }

        debug!("run_for finished at tick {}", self.ticks);
    }
}
