use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::VecDeque;
use std::time::Duration;

use super::Operation;
use crate::config::ClientConfig;

/// What the mock network does to one call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Injection {
    pub latency: Duration,
    /// Drop the call after the latency instead of forwarding it
    pub fail: bool,
}

impl Injection {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn delay(ms: u64) -> Self {
        Self {
            latency: Duration::from_millis(ms),
            fail: false,
        }
    }

    pub fn fail_after(ms: u64) -> Self {
        Self {
            latency: Duration::from_millis(ms),
            fail: true,
        }
    }
}

/// Decides latency and failure for each call through a [`MockTransport`](super::MockTransport)
pub trait FaultStrategy: Send + Sync + std::fmt::Debug {
    fn inject(&self, op: Operation) -> Injection;
}

/// Pass every call through immediately
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFaults;

impl FaultStrategy for NoFaults {
    fn inject(&self, _op: Operation) -> Injection {
        Injection::none()
    }
}

/// Uniform latency in a range, independent failure probability per write
#[derive(Debug)]
pub struct RandomFaults {
    latency_ms: std::ops::RangeInclusive<u64>,
    failure_rate: f64,
    rng: Mutex<StdRng>,
}

impl RandomFaults {
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Reproducible sequence for a given seed
    pub fn seeded(config: &ClientConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: &ClientConfig, rng: StdRng) -> Self {
        Self {
            latency_ms: config.latency_range(),
            failure_rate: config.clamped_failure_rate(),
            rng: Mutex::new(rng),
        }
    }
}

impl FaultStrategy for RandomFaults {
    fn inject(&self, op: Operation) -> Injection {
        let mut rng = self.rng.lock();
        let latency = rng.gen_range(self.latency_ms.clone());
        let fail = op.is_write() && rng.gen_bool(self.failure_rate);
        Injection {
            latency: Duration::from_millis(latency),
            fail,
        }
    }
}

/// Replays a fixed script for reorder calls
///
/// Each reorder call takes the next scripted [`Injection`]; once the script
/// runs out reorders pass through untouched. Other operations are never
/// delayed or failed.
#[derive(Debug, Default)]
pub struct ScriptedFaults {
    script: Mutex<VecDeque<Injection>>,
}

impl ScriptedFaults {
    pub fn new(script: impl IntoIterator<Item = Injection>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
        }
    }

    /// Append more injections
    pub fn push(&self, injection: Injection) {
        self.script.lock().push_back(injection);
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().len()
    }
}

impl FaultStrategy for ScriptedFaults {
    fn inject(&self, op: Operation) -> Injection {
        if op != Operation::Reorder {
            return Injection::none();
        }
        self.script.lock().pop_front().unwrap_or_default()
    }
}
