//! Command-line argument parsing.

use std::time::Duration;

use clap::Parser;

use crate::params::{LoopConfig, ParameterField, SurfaceDomain, WaveParameters};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "ripple-tank")]
#[command(about = "Two-source interference surface", long_about = None)]
pub struct Args {
    /// Source frequency (Hz, 0.5..=4)
    #[arg(long, value_name = "HZ")]
    pub frequency: Option<f64>,

    /// Wavelength (world units, 20..=200)
    #[arg(long, value_name = "UNITS")]
    pub wavelength: Option<f64>,

    /// Amplitude of source 1 (0..=20)
    #[arg(long, value_name = "UNITS")]
    pub amplitude1: Option<f64>,

    /// Amplitude of source 2 (0..=20)
    #[arg(long, value_name = "UNITS")]
    pub amplitude2: Option<f64>,

    /// Phase offset of source 2 (0..=wavelength, snapped to eighths)
    #[arg(long, value_name = "UNITS")]
    pub phase_offset: Option<f64>,

    /// Distance between the sources (0..=400)
    #[arg(long, value_name = "UNITS")]
    pub separation: Option<f64>,

    /// Grid spacing in both directions (world units)
    #[arg(long, value_name = "UNITS", default_value = "10")]
    pub step: f64,

    /// Simulated seconds per tick
    #[arg(long, value_name = "SECONDS", default_value = "0.01")]
    pub dt: f64,

    /// Wall-clock pause between ticks
    #[arg(long, value_name = "MS", default_value = "15")]
    pub wait_ms: u64,

    /// Run without a window, logging surface statistics
    #[arg(long)]
    pub headless: bool,

    /// Number of ticks to run in headless mode
    #[arg(long, value_name = "N", default_value = "400")]
    pub ticks: u64,

    /// Log a summary every N frames in headless mode (0 = never)
    #[arg(long, value_name = "N", default_value = "100")]
    pub report_every: u64,
}

impl Args {
    /// Initial wave parameters: defaults overridden by any flags given
    ///
    /// Wavelength is applied before phase offset since it bounds it.
    pub fn wave_parameters(&self) -> WaveParameters {
        let mut params = WaveParameters::default();
        let overrides = [
            (ParameterField::Frequency, self.frequency),
            (ParameterField::Wavelength, self.wavelength),
            (ParameterField::Amplitude1, self.amplitude1),
            (ParameterField::Amplitude2, self.amplitude2),
            (ParameterField::PhaseOffset, self.phase_offset),
            (ParameterField::SourceSeparation, self.separation),
        ];
        for (field, value) in overrides {
            if let Some(value) = value {
                params.set(field, value);
            }
        }
        params
    }

    pub fn surface_domain(&self) -> SurfaceDomain {
        SurfaceDomain::default().with_step(self.step)
    }

    pub fn loop_config(&self) -> LoopConfig {
        LoopConfig {
            dt_s: self.dt,
            wait: Duration::from_millis(self.wait_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::surface::RippleTank;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["ripple-tank"]);
        assert_eq!(args.wave_parameters(), WaveParameters::default());
        assert_eq!(args.surface_domain(), SurfaceDomain::default());
        assert_eq!(args.loop_config(), LoopConfig::default());
        assert!(!args.headless);
    }

    #[test]
    fn test_overrides_are_clamped() {
        let args = Args::parse_from([
            "ripple-tank",
            "--wavelength",
            "160",
            "--phase-offset",
            "80",
            "--frequency",
            "9",
            "--separation",
            "120",
            "--headless",
            "--ticks",
            "5",
        ]);
        let params = args.wave_parameters();
        assert_eq!(params.wavelength(), 160.0);
        assert_eq!(params.phase_offset(), 80.0);
        assert_eq!(params.frequency_hz(), 4.0);
        assert_eq!(params.source_separation(), 120.0);
        assert!(args.headless);
        assert_eq!(args.ticks, 5);
    }

    #[test]
    fn test_negative_dt_fails_tank_construction() {
        let args = Args::parse_from(["ripple-tank", "--dt=-0.01"]);
        let result = RippleTank::new(
            args.wave_parameters(),
            args.surface_domain(),
            &args.loop_config(),
        );
        assert!(matches!(result, Err(Error::InvalidTimeStep(_))));
    }

    #[test]
    fn test_tiny_step_fails_tank_construction() {
        let args = Args::parse_from(["ripple-tank", "--step", "0.001"]);
        let result = RippleTank::new(
            args.wave_parameters(),
            args.surface_domain(),
            &args.loop_config(),
        );
        assert!(matches!(result, Err(Error::InvalidDomain(_))));
    }
}
