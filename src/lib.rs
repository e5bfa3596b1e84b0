//! Ripple tank library - two-source interference surface simulation

pub mod bridge;
pub mod camera;
pub mod cli;
pub mod clock;
pub mod error;
pub mod field;
pub mod params;
pub mod rendering;
pub mod simulation;
pub mod surface;

pub use error::{Error, Result};
