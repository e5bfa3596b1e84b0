//! Error types for the ripple tank core.

use thiserror::Error;

use crate::params::ParameterField;

/// Main error type for surface, parameter and bridge operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Grid bounds or steps cannot produce a lattice
    #[error("invalid surface domain: {0}")]
    InvalidDomain(String),

    /// A parameter value fell outside its declared range
    #[error("{field} = {value} is outside [{min}, {max}]")]
    ParameterOutOfRange {
        field: ParameterField,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Simulation step must be finite and positive
    #[error("invalid time step: dt = {0} s")]
    InvalidTimeStep(f64),

    /// Unknown parameter name (CLI / UI parsing)
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),

    /// Renderer rejected a submission
    #[error("render bridge error: {0}")]
    Render(String),
}

/// Result type alias for ripple tank operations
pub type Result<T> = std::result::Result<T, Error>;
