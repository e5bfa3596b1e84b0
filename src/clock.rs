//! Simulated time, wrapped to one oscillation period.

use crate::error::{Error, Result};

/// Fixed-step simulation clock
///
/// Time is kept in `[0, period)` by subtracting whole periods, never by
/// resetting, so the phase stays continuous while the argument to `sin`
/// stays small no matter how long the session runs.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationClock {
    t_s: f64,
    dt_s: f64,
}

impl SimulationClock {
    /// Clock at `t = 0`; `dt_s` must be finite and positive
    pub fn new(dt_s: f64) -> Result<Self> {
        if !dt_s.is_finite() || dt_s <= 0.0 {
            return Err(Error::InvalidTimeStep(dt_s));
        }
        Ok(Self { t_s: 0.0, dt_s })
    }

    /// Current simulated time (seconds)
    pub fn time(&self) -> f64 {
        self.t_s
    }

    /// Step added per tick (seconds)
    pub fn dt(&self) -> f64 {
        self.dt_s
    }

    pub fn reset(&mut self) {
        self.t_s = 0.0;
    }

    /// Advance by one step and wrap into `[0, 1/frequency_hz)`
    ///
    /// Removes as many whole periods as needed, so a frequency increase or a
    /// step longer than one period still lands inside the current period.
    pub fn tick(&mut self, frequency_hz: f64) -> f64 {
        self.t_s += self.dt_s;

        let period = 1.0 / frequency_hz;
        if period.is_finite() && period > 0.0 {
            self.t_s = self.t_s.rem_euclid(period);
        }

        self.t_s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_tick_advances_by_dt() {
        let mut clock = SimulationClock::new(0.01).unwrap();
        assert_abs_diff_eq!(clock.tick(4.0), 0.01);
        assert_abs_diff_eq!(clock.tick(4.0), 0.02, epsilon = 1e-15);
    }

    #[test]
    fn test_repeated_ticks_equal_time_mod_period() {
        let frequency = 4.0;
        let period = 1.0 / frequency;

        for n in [7_usize, 26, 137, 1001, 25_013] {
            let mut clock = SimulationClock::new(0.01).unwrap();
            for _ in 0..n {
                clock.tick(frequency);
            }
            let expected = (n as f64 * 0.01) % period;
            assert_abs_diff_eq!(clock.time(), expected, epsilon = 1e-9);
            assert!(clock.time() >= 0.0 && clock.time() < period);
        }
    }

    #[test]
    fn test_wrap_preserves_fractional_phase() {
        let mut clock = SimulationClock::new(0.3).unwrap();
        // period 0.5: 0.3 → 0.6 - 0.5 = 0.1
        clock.tick(2.0);
        assert_abs_diff_eq!(clock.tick(2.0), 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_frequency_increase_wraps_fully() {
        let mut clock = SimulationClock::new(0.01).unwrap();
        for _ in 0..150 {
            clock.tick(0.5); // period 2.0, t ≈ 1.5
        }
        let t = clock.tick(4.0);
        assert!(t < 0.25, "t = {} not wrapped into new period", t);
    }

    #[test]
    fn test_step_far_longer_than_period_still_wraps() {
        let mut clock = SimulationClock::new(1e20).unwrap();
        for _ in 0..3 {
            let t = clock.tick(4.0);
            assert!((0.0..0.25).contains(&t), "t = {} outside [0, 0.25)", t);
        }

        let mut clock = SimulationClock::new(1.3).unwrap();
        assert_abs_diff_eq!(clock.tick(2.0), 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_non_positive_or_non_finite_step_is_rejected() {
        for dt in [0.0, -0.01, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(SimulationClock::new(dt), Err(Error::InvalidTimeStep(_))),
                "dt = {} accepted",
                dt
            );
        }
    }
}
