//! Measured acquisition rate, EWMA over frame inter-arrival times.

use std::time::{Duration, Instant};

const EWMA_ALPHA: f64 = 0.2;

/// Tracks the observed frame rate of a session.
///
/// Seeded from the nominal configured frequency so `hz()` is sane before
/// the first frames arrive, and floored at 1 Hz so pacing intervals derived
/// from it stay bounded.
#[derive(Debug, Clone)]
pub struct RateTracker {
    nominal_hz: f64,
    ewma_interval_s: Option<f64>,
    last_arrival: Option<Instant>,
}

impl RateTracker {
    pub fn new(nominal_hz: f64) -> Self {
        Self {
            nominal_hz,
            ewma_interval_s: None,
            last_arrival: None,
        }
    }

    /// Record a frame arrival at the current instant.
    pub fn tick(&mut self) {
        let now = Instant::now();
        if let Some(last) = self.last_arrival {
            self.observe(now - last);
        }
        self.last_arrival = Some(now);
    }

    fn observe(&mut self, dt: Duration) {
        let dt = dt.as_secs_f64();
        if dt <= 0.0 {
            return;
        }
        self.ewma_interval_s = Some(match self.ewma_interval_s {
            Some(ewma) => EWMA_ALPHA * dt + (1.0 - EWMA_ALPHA) * ewma,
            None => dt,
        });
    }

    /// Current rate estimate in Hz, never below 1.0.
    pub fn hz(&self) -> f64 {
        let hz = match self.ewma_interval_s {
            Some(interval) => 1.0 / interval,
            None => self.nominal_hz,
        };
        hz.max(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nominal_before_first_frames() {
        let tracker = RateTracker::new(30.0);
        assert_eq!(tracker.hz(), 30.0);
    }

    #[test]
    fn test_converges_to_observed_interval() {
        let mut tracker = RateTracker::new(30.0);
        for _ in 0..50 {
            tracker.observe(Duration::from_millis(100));
        }
        let hz = tracker.hz();
        assert!((hz - 10.0).abs() < 0.5, "hz = {hz}");
    }

    #[test]
    fn test_rate_change_shifts_estimate() {
        let mut tracker = RateTracker::new(30.0);
        for _ in 0..50 {
            tracker.observe(Duration::from_millis(50));
        }
        let before = tracker.hz();
        for _ in 0..50 {
            tracker.observe(Duration::from_millis(200));
        }
        let after = tracker.hz();
        assert!(before > 15.0);
        assert!(after < 7.0, "after = {after}");
    }

    #[test]
    fn test_floored_at_one_hz() {
        let mut tracker = RateTracker::new(0.001);
        assert_eq!(tracker.hz(), 1.0);
        for _ in 0..10 {
            tracker.observe(Duration::from_secs(30));
        }
        assert_eq!(tracker.hz(), 1.0);
    }
}
