//! Height of the interference pattern as a function of source distances and time.

use crate::params::WaveParameters;

/// Vertical displacement of the two source markers at one instant
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SourceMotion {
    pub z1: f64,
    pub z2: f64,
}

/// Superposition of two circular travelling waves
///
/// Holds only a borrow of the current parameters, so it always evaluates with
/// up-to-date derived constants.
#[derive(Clone, Copy, Debug)]
pub struct WaveField<'a> {
    params: &'a WaveParameters,
}

impl<'a> WaveField<'a> {
    pub fn new(params: &'a WaveParameters) -> Self {
        Self { params }
    }

    /// Surface height for a point `r1`, `r2` away from the sources at time `t_s`
    ///
    /// ```text
    /// a1·sin(ωt − r1/k) + a2·sin(ωt − (r2 − φ)/k)
    /// ```
    #[inline]
    pub fn evaluate(&self, r1: f64, r2: f64, t_s: f64) -> f64 {
        let p = self.params;
        let k = p.angular_wavenumber();
        let omega_t = p.angular_frequency() * t_s;

        p.amplitude1() * (omega_t - r1 / k).sin()
            + p.amplitude2() * (omega_t - (r2 - p.phase_offset()) / k).sin()
    }

    /// Bobbing of the sources themselves; presentation only, not part of the field
    pub fn source_motion(&self, t_s: f64) -> SourceMotion {
        let p = self.params;
        let omega_t = p.angular_frequency() * t_s;

        SourceMotion {
            z1: p.amplitude1() * omega_t.sin(),
            z2: p.amplitude2() * (omega_t + p.phase_offset() / p.angular_wavenumber()).sin(),
        }
    }
}
