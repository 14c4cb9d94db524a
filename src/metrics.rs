//! Prometheus-compatible metrics
//!
//! Counters for the leaderboard API, served as Prometheus text from the
//! router's /metrics route.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Metrics registry for the leaderboard server
#[derive(Debug)]
pub struct Metrics {
    /// Accepted run submissions
    pub submissions: AtomicU64,
    /// Submissions carrying the verified flag
    pub verified_submissions: AtomicU64,
    /// Submissions rejected at validation
    pub rejected_submissions: AtomicU64,
    /// Leaderboard reads served
    pub leaderboard_reads: AtomicU64,
    /// Store failures surfaced as 500s
    pub store_errors: AtomicU64,

    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            submissions: AtomicU64::new(0),
            verified_submissions: AtomicU64::new(0),
            rejected_submissions: AtomicU64::new(0),
            leaderboard_reads: AtomicU64::new(0),
            store_errors: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Get uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Generate Prometheus-format metrics output
    pub fn to_prometheus(&self) -> String {
        let mut output = String::with_capacity(1024);

        macro_rules! metric {
            ($name:expr, $help:expr, $type:expr, $value:expr) => {
                output.push_str(&format!(
                    "# HELP {} {}\n# TYPE {} {}\n{} {}\n",
                    $name, $help, $name, $type, $name, $value
                ));
            };
        }

        metric!(
            "pragma_survival_submissions_total",
            "Accepted run submissions",
            "counter",
            self.submissions.load(Ordering::Relaxed)
        );
        metric!(
            "pragma_survival_verified_submissions_total",
            "Accepted submissions with the verified flag",
            "counter",
            self.verified_submissions.load(Ordering::Relaxed)
        );
        metric!(
            "pragma_survival_rejected_submissions_total",
            "Submissions rejected at validation",
            "counter",
            self.rejected_submissions.load(Ordering::Relaxed)
        );
        metric!(
            "pragma_survival_leaderboard_reads_total",
            "Leaderboard reads served",
            "counter",
            self.leaderboard_reads.load(Ordering::Relaxed)
        );
        metric!(
            "pragma_survival_store_errors_total",
            "Store failures surfaced to clients",
            "counter",
            self.store_errors.load(Ordering::Relaxed)
        );
        metric!(
            "pragma_survival_uptime_seconds",
            "Server uptime in seconds",
            "counter",
            self.uptime_seconds()
        );

        output
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
