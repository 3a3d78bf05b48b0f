//! Viewer run statistics.

use std::time::Duration;

use observability::SessionStatsAggregator;

/// Statistics from a viewer run
#[derive(Debug, Clone, Default)]
pub struct ViewerStats {
    /// Frames grabbed and processed
    pub frames_grabbed: u64,

    /// Frames dropped at intake under backpressure
    pub frames_dropped: u64,

    /// Total duration of the run
    pub duration: Duration,

    /// Number of sinks that received views
    pub active_sinks: usize,

    /// Sink writes that failed
    pub sink_errors: u64,

    /// Per-iteration aggregates (grab latency, coverage, rate)
    pub session_stats: SessionStatsAggregator,
}

impl ViewerStats {
    /// Processed frames per second over the whole run
    pub fn fps(&self) -> f64 {
        if self.duration.as_secs_f64() > 0.0 {
            self.frames_grabbed as f64 / self.duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Print detailed summary
    pub fn print_summary(&self) {
        println!("\n=== Viewer Statistics ===\n");
        println!("Overview");
        println!("  ├─ Duration: {:.2}s", self.duration.as_secs_f64());
        println!("  ├─ Frames grabbed: {}", self.frames_grabbed);
        println!("  ├─ Frames dropped: {}", self.frames_dropped);
        println!("  ├─ FPS: {:.2}", self.fps());
        println!("  ├─ Active sinks: {}", self.active_sinks);
        println!("  └─ Sink errors: {}", self.sink_errors);

        let summary = self.session_stats.summary();
        println!();
        print!("{}", summary);
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps() {
        let stats = ViewerStats {
            frames_grabbed: 60,
            duration: Duration::from_secs(2),
            ..Default::default()
        };
        assert!((stats.fps() - 30.0).abs() < 1e-10);
    }

    #[test]
    fn test_fps_zero_duration() {
        let stats = ViewerStats::default();
        assert_eq!(stats.fps(), 0.0);
    }
}
