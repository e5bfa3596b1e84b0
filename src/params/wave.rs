//! Wave source parameters and their derived angular constants.

use std::f64::consts::TAU;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use log::warn;

use crate::error::{Error, Result};

/// One of the six tunable wave parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterField {
    Frequency,
    Wavelength,
    Amplitude1,
    Amplitude2,
    PhaseOffset,
    SourceSeparation,
}

impl ParameterField {
    pub const ALL: [ParameterField; 6] = [
        ParameterField::Frequency,
        ParameterField::Wavelength,
        ParameterField::Amplitude1,
        ParameterField::Amplitude2,
        ParameterField::PhaseOffset,
        ParameterField::SourceSeparation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            ParameterField::Frequency => "frequency",
            ParameterField::Wavelength => "wavelength",
            ParameterField::Amplitude1 => "amplitude1",
            ParameterField::Amplitude2 => "amplitude2",
            ParameterField::PhaseOffset => "phase-offset",
            ParameterField::SourceSeparation => "separation",
        }
    }

    /// Allowed range for this field given the current parameters.
    ///
    /// Phase offset is bounded by the current wavelength, every other range
    /// is fixed.
    pub fn range(self, params: &WaveParameters) -> RangeInclusive<f64> {
        match self {
            ParameterField::Frequency => 0.5..=4.0,
            ParameterField::Wavelength => 20.0..=200.0,
            ParameterField::Amplitude1 | ParameterField::Amplitude2 => 0.0..=20.0,
            ParameterField::PhaseOffset => 0.0..=params.wavelength,
            ParameterField::SourceSeparation => 0.0..=400.0,
        }
    }

    /// Control increment, if the field is stepped
    pub fn step(self, params: &WaveParameters) -> Option<f64> {
        match self {
            ParameterField::PhaseOffset => Some(params.wavelength / 8.0),
            _ => None,
        }
    }

    /// Check a value against the field's range without modifying anything
    pub fn check(self, value: f64, params: &WaveParameters) -> Result<f64> {
        let range = self.range(params);
        if range.contains(&value) {
            Ok(value)
        } else {
            Err(Error::ParameterOutOfRange {
                field: self,
                value,
                min: *range.start(),
                max: *range.end(),
            })
        }
    }
}

impl fmt::Display for ParameterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ParameterField {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "frequency" | "f" => Ok(ParameterField::Frequency),
            "wavelength" | "lambda" => Ok(ParameterField::Wavelength),
            "amplitude1" | "a1" => Ok(ParameterField::Amplitude1),
            "amplitude2" | "a2" => Ok(ParameterField::Amplitude2),
            "phase-offset" | "phase" => Ok(ParameterField::PhaseOffset),
            "separation" | "d" => Ok(ParameterField::SourceSeparation),
            other => Err(Error::UnknownParameter(other.to_string())),
        }
    }
}

/// Physical constants of the two coherent sources
///
/// Fields are private so the derived constants can never drift from the
/// values they are computed from; every mutation goes through [`set`].
///
/// [`set`]: WaveParameters::set
#[derive(Debug, Clone, PartialEq)]
pub struct WaveParameters {
    /// Oscillation frequency (Hz)
    frequency_hz: f64,

    /// Distance between wave crests (world units)
    wavelength: f64,

    /// Peak height contributed by source 1 (world units)
    amplitude1: f64,

    /// Peak height contributed by source 2 (world units)
    amplitude2: f64,

    /// Path offset applied to source 2 (world units, 0..=wavelength)
    phase_offset: f64,

    /// Distance between the two sources along x (world units)
    source_separation: f64,

    /// wavelength / 2π
    angular_wavenumber: f64,

    /// frequency · 2π
    angular_frequency: f64,
}

impl Default for WaveParameters {
    fn default() -> Self {
        let frequency_hz = 4.0;
        let wavelength = 80.0;
        Self {
            frequency_hz,
            wavelength,
            amplitude1: 10.0,
            amplitude2: 10.0,
            phase_offset: 0.0, // 0 or half a wavelength are the interesting cases
            source_separation: 10.0,
            angular_wavenumber: wavelength / TAU,
            angular_frequency: frequency_hz * TAU,
        }
    }
}

impl WaveParameters {
    pub fn frequency_hz(&self) -> f64 {
        self.frequency_hz
    }

    pub fn wavelength(&self) -> f64 {
        self.wavelength
    }

    pub fn amplitude1(&self) -> f64 {
        self.amplitude1
    }

    pub fn amplitude2(&self) -> f64 {
        self.amplitude2
    }

    pub fn phase_offset(&self) -> f64 {
        self.phase_offset
    }

    pub fn source_separation(&self) -> f64 {
        self.source_separation
    }

    /// Spatial scaling constant (wavelength / 2π, used as a divisor)
    pub fn angular_wavenumber(&self) -> f64 {
        self.angular_wavenumber
    }

    /// Temporal scaling constant (rad/s)
    pub fn angular_frequency(&self) -> f64 {
        self.angular_frequency
    }

    /// One oscillation period (seconds)
    pub fn period_s(&self) -> f64 {
        1.0 / self.frequency_hz
    }

    pub fn get(&self, field: ParameterField) -> f64 {
        match field {
            ParameterField::Frequency => self.frequency_hz,
            ParameterField::Wavelength => self.wavelength,
            ParameterField::Amplitude1 => self.amplitude1,
            ParameterField::Amplitude2 => self.amplitude2,
            ParameterField::PhaseOffset => self.phase_offset,
            ParameterField::SourceSeparation => self.source_separation,
        }
    }

    /// Store a new value and recompute whatever depends on it.
    ///
    /// Out-of-range input is clamped to the nearest bound and logged; NaN is
    /// ignored. Phase offset snaps to the nearest eighth of a wavelength.
    /// Returns the value actually stored. A change of source separation only
    /// updates the stored value here: the owner of the grid must rebuild the
    /// source positions and distance caches.
    pub fn set(&mut self, field: ParameterField, value: f64) -> f64 {
        let value = self.sanitize(field, value);

        match field {
            ParameterField::Frequency => {
                self.frequency_hz = value;
                self.angular_frequency = value * TAU;
            }
            ParameterField::Wavelength => {
                self.wavelength = value;
                self.angular_wavenumber = value / TAU;
            }
            ParameterField::Amplitude1 => self.amplitude1 = value,
            ParameterField::Amplitude2 => self.amplitude2 = value,
            ParameterField::PhaseOffset => self.phase_offset = value,
            ParameterField::SourceSeparation => self.source_separation = value,
        }

        value
    }

    fn sanitize(&self, field: ParameterField, value: f64) -> f64 {
        if value.is_nan() {
            warn!("Ignoring NaN for {}", field);
            return self.get(field);
        }

        let range = field.range(self);
        let value = match field.check(value, self) {
            Ok(value) => value,
            Err(err) => {
                warn!("{}, clamping", err);
                value.clamp(*range.start(), *range.end())
            }
        };

        match field.step(self) {
            Some(step) if step > 0.0 => ((value / step).round() * step).min(*range.end()),
            _ => value,
        }
    }
}
