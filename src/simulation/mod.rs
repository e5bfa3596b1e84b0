//! Timer-driven simulation loop.

mod runner;
mod scheduler;

// Re-export public types
pub use runner::{LoopState, ParameterQueue, SimulationLoop};
pub use scheduler::{ManualTimer, Scheduler, Timer, WallTimer};
