//! Wall-clock accounting for solve steps.
//!
//! A solve step has to fit inside the control period, so it is worth knowing
//! how much of it is used. Nothing is measured unless timing was switched on
//! with [`enable_timing`] or the `LM_TIMING` environment variable is set.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

static ENABLED: AtomicBool = AtomicBool::new(false);
static FROM_ENV: OnceLock<bool> = OnceLock::new();

pub fn enable_timing() {
    ENABLED.store(true, Ordering::Relaxed);
}

pub fn disable_timing() {
    ENABLED.store(false, Ordering::Relaxed);
}

/// True when switched on programmatically or through `LM_TIMING`.
pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
        || *FROM_ENV.get_or_init(|| std::env::var_os("LM_TIMING").is_some())
}

/// Running count, total and worst case of measured calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimingStats {
    count: u64,
    total: Duration,
    max: Duration,
}

impl TimingStats {
    pub const fn new() -> Self {
        Self {
            count: 0,
            total: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    pub fn record(&mut self, elapsed: Duration) {
        self.count += 1;
        self.total += elapsed;
        self.max = self.max.max(elapsed);
    }

    /// Run `f`, recording its duration when timing is enabled.
    pub fn measure<R>(&mut self, f: impl FnOnce() -> R) -> R {
        if !is_enabled() {
            return f();
        }
        let start = Instant::now();
        let out = f();
        self.record(start.elapsed());
        out
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn total_seconds(&self) -> f64 {
        self.total.as_secs_f64()
    }

    pub fn max_seconds(&self) -> f64 {
        self.max.as_secs_f64()
    }

    /// Zero when nothing was recorded.
    pub fn average_seconds(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_seconds() / self.count as f64
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}
