use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::Duration;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Wall clock in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_millis(&self) -> i64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicI64,
}

impl ManualClock {
    pub fn new(now_millis: i64) -> Self {
        Self {
            now: AtomicI64::new(now_millis),
        }
    }

    pub fn set(&self, now_millis: i64) {
        self.now.store(now_millis, Ordering::SeqCst);
    }

    pub fn advance(&self, by: Duration) {
        self.now
            .fetch_add(by.as_millis() as i64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> i64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Source of uniform samples in `[0, 1)`.
pub trait RandomSource: Send + Sync {
    fn next_unit(&self) -> f64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_unit(&self) -> f64 {
        rand::thread_rng().r#gen::<f64>()
    }
}

/// Reproducible sequence from a fixed seed.
#[derive(Debug)]
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&self) -> f64 {
        match self.rng.lock() {
            Ok(mut rng) => rng.r#gen::<f64>(),
            Err(poisoned) => poisoned.into_inner().r#gen::<f64>(),
        }
    }
}

/// Replays the given samples in order, repeating the last one once exhausted.
#[derive(Debug)]
pub struct ScriptedRandom {
    samples: Mutex<VecDeque<f64>>,
    last: Mutex<f64>,
}

impl ScriptedRandom {
    pub fn new(samples: impl IntoIterator<Item = f64>) -> Self {
        Self {
            samples: Mutex::new(samples.into_iter().collect()),
            last: Mutex::new(0.0),
        }
    }

    pub fn constant(sample: f64) -> Self {
        Self::new([sample])
    }
}

impl RandomSource for ScriptedRandom {
    fn next_unit(&self) -> f64 {
        let mut last = self.last.lock().unwrap_or_else(|err| err.into_inner());
        let mut samples = self.samples.lock().unwrap_or_else(|err| err.into_inner());
        if let Some(sample) = samples.pop_front() {
            *last = sample.clamp(0.0, 1.0);
        }
        *last
    }
}

const BELOW_ONE: f64 = 1.0 - f64::EPSILON;

/// Uniform float in `[low, high)`.
pub fn uniform_f64(random: &dyn RandomSource, low: f64, high: f64) -> f64 {
    let unit = random.next_unit().clamp(0.0, BELOW_ONE);
    low + unit * (high - low)
}

/// Uniform integer in `[low, high)`. `high` must exceed `low`.
pub fn uniform_u64(random: &dyn RandomSource, low: u64, high: u64) -> u64 {
    let span = high.saturating_sub(low).max(1);
    let unit = random.next_unit().clamp(0.0, BELOW_ONE);
    let offset = (unit * span as f64).floor() as u64;
    low + offset.min(span - 1)
}
