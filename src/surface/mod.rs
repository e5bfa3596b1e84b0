//! Interference surface: source placement, sample lattice and the model that ties them together.

mod grid;
mod sources;
mod system;

// Re-export public types
pub use grid::{GridPoint, SurfaceGrid};
pub use sources::{SourceGeometry, SourcePair};
pub use system::{ParameterChange, RippleTank};
