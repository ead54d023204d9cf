//! Client configuration

use std::ops::RangeInclusive;

/// Mock transport settings
///
/// | Variable | Default |
/// |----------|---------|
/// | TALENT_LATENCY_MIN_MS | 200 |
/// | TALENT_LATENCY_MAX_MS | 1200 |
/// | TALENT_FAILURE_RATE | 0.1 |
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Lower bound of simulated latency (milliseconds)
    pub latency_min_ms: u64,

    /// Upper bound of simulated latency (milliseconds)
    pub latency_max_ms: u64,

    /// Probability in `[0, 1]` that a write call fails in transit
    pub failure_rate: f64,
}

impl ClientConfig {
    pub fn new() -> Self {
        Self {
            latency_min_ms: 200,
            latency_max_ms: 1200,
            failure_rate: 0.1,
        }
    }

    /// Load from the environment, falling back to defaults
    pub fn from_env() -> Self {
        let defaults = Self::new();
        Self {
            latency_min_ms: std::env::var("TALENT_LATENCY_MIN_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.latency_min_ms),
            latency_max_ms: std::env::var("TALENT_LATENCY_MAX_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.latency_max_ms),
            failure_rate: std::env::var("TALENT_FAILURE_RATE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.failure_rate),
        }
    }

    /// Set the latency range
    pub fn with_latency(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.latency_min_ms = min_ms;
        self.latency_max_ms = max_ms;
        self
    }

    /// Set the failure probability
    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        self.failure_rate = rate;
        self
    }

    /// Latency range with the bounds put in order
    pub fn latency_range(&self) -> RangeInclusive<u64> {
        let min = self.latency_min_ms.min(self.latency_max_ms);
        let max = self.latency_min_ms.max(self.latency_max_ms);
        min..=max
    }

    /// Failure probability clamped to `[0, 1]`; NaN counts as 0
    pub fn clamped_failure_rate(&self) -> f64 {
        if self.failure_rate.is_nan() {
            0.0
        } else {
            self.failure_rate.clamp(0.0, 1.0)
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}
