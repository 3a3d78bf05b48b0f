//! Viewer metrics collection
//!
//! Prometheus-style counters and gauges for the acquisition loop, plus an
//! in-memory aggregator for the end-of-run summary.

use contracts::CaptureMode;
use metrics::{counter, gauge, histogram};

/// Record a successfully grabbed frame.
pub fn record_frame_grabbed(mode: CaptureMode) {
    counter!(
        "depthview_frames_grabbed_total",
        "mode" => mode.to_string()
    )
    .increment(1);
}

/// Record frames dropped at intake under backpressure.
pub fn record_frame_dropped(count: u64) {
    if count > 0 {
        counter!("depthview_frames_dropped_total").increment(count);
    }
}

/// Record the latency of one grab call.
pub fn record_grab_latency_ms(latency_ms: f64) {
    histogram!("depthview_grab_latency_ms").record(latency_ms);
}

/// Record the result of a floor-plane fit on the current frame.
///
/// A fit that found no plane is recorded with `coverage = None`.
pub fn record_floor_fit(inlier_ratio: Option<f64>, coverage: Option<f64>) {
    match inlier_ratio {
        Some(ratio) => {
            counter!("depthview_floor_fits_total", "status" => "found").increment(1);
            gauge!("depthview_floor_inlier_ratio").set(ratio);
            histogram!("depthview_floor_inlier_ratio_hist").record(ratio);
        }
        None => {
            counter!("depthview_floor_fits_total", "status" => "missed").increment(1);
        }
    }
    if let Some(coverage) = coverage {
        gauge!("depthview_floor_coverage").set(coverage);
        histogram!("depthview_floor_coverage_hist").record(coverage);
    }
}

/// Record a view frame routed to a sink.
pub fn record_frame_routed(sink_name: &str, success: bool) {
    let status = if success { "success" } else { "failure" };
    counter!(
        "depthview_frames_routed_total",
        "sink" => sink_name.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}

/// Session statistics aggregator
///
/// Aggregates per-iteration stats in memory for the end-of-run summary.
#[derive(Debug, Clone, Default)]
pub struct SessionStatsAggregator {
    /// Frames grabbed
    pub total_frames: u64,

    /// Frames where a floor plane was found
    pub frames_with_floor: u64,

    /// Frames dropped at intake
    pub total_dropped: u64,

    /// Grab latency statistics (ms)
    pub grab_latency_ms: RunningStats,

    /// Floor coverage statistics (fraction of pixels)
    pub coverage_stats: RunningStats,

    /// Plane-fit inlier ratio statistics
    pub inlier_stats: RunningStats,

    /// Measured acquisition rate statistics (Hz)
    pub rate_stats: RunningStats,
}

impl SessionStatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one loop iteration.
    pub fn record_iteration(
        &mut self,
        grab_latency_ms: f64,
        rate_hz: f64,
        floor: Option<(f64, f64)>,
    ) {
        self.total_frames += 1;
        self.grab_latency_ms.push(grab_latency_ms);
        self.rate_stats.push(rate_hz);

        if let Some((inlier_ratio, coverage)) = floor {
            self.frames_with_floor += 1;
            self.inlier_stats.push(inlier_ratio);
            self.coverage_stats.push(coverage);
        }
    }

    /// Total dropped counter is cumulative; callers pass the latest reading.
    pub fn set_dropped(&mut self, dropped: u64) {
        self.total_dropped = dropped;
    }

    /// Produce a summary report.
    pub fn summary(&self) -> ViewerSummary {
        ViewerSummary {
            total_frames: self.total_frames,
            frames_with_floor: self.frames_with_floor,
            total_dropped: self.total_dropped,
            floor_rate: if self.total_frames > 0 {
                self.frames_with_floor as f64 / self.total_frames as f64 * 100.0
            } else {
                0.0
            },
            grab_latency_ms: StatsSummary::from(&self.grab_latency_ms),
            coverage: StatsSummary::from(&self.coverage_stats),
            inlier_ratio: StatsSummary::from(&self.inlier_stats),
            rate_hz: StatsSummary::from(&self.rate_stats),
        }
    }
}

/// End-of-run summary
#[derive(Debug, Clone, Default)]
pub struct ViewerSummary {
    pub total_frames: u64,
    pub frames_with_floor: u64,
    pub total_dropped: u64,
    pub floor_rate: f64,
    pub grab_latency_ms: StatsSummary,
    pub coverage: StatsSummary,
    pub inlier_ratio: StatsSummary,
    pub rate_hz: StatsSummary,
}

impl std::fmt::Display for ViewerSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Viewer Session Summary ===")?;
        writeln!(f, "Frames grabbed: {}", self.total_frames)?;
        writeln!(
            f,
            "Frames with floor: {} ({:.2}%)",
            self.frames_with_floor, self.floor_rate
        )?;
        writeln!(f, "Frames dropped at intake: {}", self.total_dropped)?;
        writeln!(f, "Grab latency (ms): {}", self.grab_latency_ms)?;
        writeln!(f, "Floor coverage: {}", self.coverage)?;
        writeln!(f, "Plane inlier ratio: {}", self.inlier_ratio)?;
        writeln!(f, "Acquisition rate (Hz): {}", self.rate_hz)?;
        Ok(())
    }
}

/// Statistics summary
#[derive(Debug, Clone, Default)]
pub struct StatsSummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl From<&RunningStats> for StatsSummary {
    fn from(stats: &RunningStats) -> Self {
        Self {
            count: stats.count(),
            min: stats.min(),
            max: stats.max(),
            mean: stats.mean(),
            std_dev: stats.std_dev(),
        }
    }
}

impl std::fmt::Display for StatsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            write!(f, "N/A")
        } else {
            write!(
                f,
                "min={:.3}, max={:.3}, mean={:.3}, std={:.3} (n={})",
                self.min, self.max, self.mean, self.std_dev, self.count
            )
        }
    }
}

/// Online statistics (Welford's algorithm)
#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    count: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl RunningStats {
    /// Add a new sample
    pub fn push(&mut self, value: f64) {
        self.count += 1;

        if self.count == 1 {
            self.min = value;
            self.max = value;
            self.mean = value;
            self.m2 = 0.0;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);

            let delta = value - self.mean;
            self.mean += delta / self.count as f64;
            let delta2 = value - self.mean;
            self.m2 += delta * delta2;
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.m2 / (self.count - 1) as f64
        }
    }

    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }
}
