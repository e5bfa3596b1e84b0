//! Parameter definitions with physical units and documented semantics.
//!
//! Every tunable number lives here with:
//! - Units (world units, seconds, Hz)
//! - Documented ranges and meanings
//! - A `Default` matching the classic ripple tank demo

mod camera;
mod render;
mod surface;
mod wave;

// Re-export all types
pub use camera::OrbitParams;
pub use render::RenderConfig;
pub use surface::{LoopConfig, SurfaceDomain, MAX_GRID_POINTS};
pub use wave::{ParameterField, WaveParameters};
