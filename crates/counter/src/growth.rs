use std::ops::{Range, RangeInclusive};
use std::sync::Arc;

use crate::counter_store::CounterStore;
use crate::error::Result;
use crate::seams::{Clock, RandomSource, uniform_f64, uniform_u64};
use crate::store::KeyValueStore;

/// Days between simulated bumps, redrawn on every check.
pub const INTERVAL_DAYS: Range<f64> = 2.0..4.0;
/// Size of one simulated bump.
pub const INCREMENT_RANGE: RangeInclusive<u64> = 1..=5;

const MILLIS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

/// Fabricates a plausible traffic trajectory for the local counter tier.
#[derive(Clone)]
pub struct GrowthSimulator {
    clock: Arc<dyn Clock>,
    random: Arc<dyn RandomSource>,
}

impl GrowthSimulator {
    pub fn new(clock: Arc<dyn Clock>, random: Arc<dyn RandomSource>) -> Self {
        Self { clock, random }
    }

    /// First observation only records the timestamp. Afterwards returns true
    /// once the elapsed days reach a freshly drawn interval, and moves the
    /// timestamp to now when it does.
    pub fn should_increment<S: KeyValueStore>(
        &self,
        counters: &mut CounterStore<S>,
        project_id: &str,
    ) -> Result<bool> {
        let now = self.clock.now_millis();
        let Some(last) = counters.last_increment(project_id) else {
            counters.set_last_increment(project_id, now)?;
            return Ok(false);
        };
        let elapsed_days = now.saturating_sub(last) as f64 / MILLIS_PER_DAY;
        let interval = uniform_f64(self.random.as_ref(), INTERVAL_DAYS.start, INTERVAL_DAYS.end);
        if elapsed_days >= interval {
            counters.set_last_increment(project_id, now)?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Adds a random bump to the current count and persists it.
    pub fn apply_increment<S: KeyValueStore>(
        &self,
        counters: &mut CounterStore<S>,
        project_id: &str,
    ) -> Result<u64> {
        let current = counters.get(project_id)?;
        let increment = uniform_u64(
            self.random.as_ref(),
            *INCREMENT_RANGE.start(),
            *INCREMENT_RANGE.end() + 1,
        );
        let next = current.saturating_add(increment);
        counters.set(project_id, next)?;
        tracing::debug!(project_id, increment, count = next, "applied simulated growth");
        Ok(next)
    }

    /// The whole local path: read (seeding if needed), maybe bump, return.
    pub fn observe<S: KeyValueStore>(
        &self,
        counters: &mut CounterStore<S>,
        project_id: &str,
    ) -> Result<u64> {
        let current = counters.get(project_id)?;
        if self.should_increment(counters, project_id)? {
            return self.apply_increment(counters, project_id);
        }
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::seams::{ManualClock, ScriptedRandom, ThreadRandom};
    use crate::store::MemoryStore;

    const DAY: Duration = Duration::from_secs(24 * 60 * 60);

    fn setup(
        random: Arc<dyn RandomSource>,
    ) -> (Arc<ManualClock>, GrowthSimulator, CounterStore<MemoryStore>) {
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let growth = GrowthSimulator::new(clock.clone(), random.clone());
        let counters = CounterStore::new(MemoryStore::new(), random);
        (clock, growth, counters)
    }

    #[test]
    fn first_observation_records_timestamp_without_increment() {
        let (clock, growth, mut counters) = setup(Arc::new(ThreadRandom));
        assert!(!growth.should_increment(&mut counters, "demo").expect("check"));
        assert_eq!(counters.last_increment("demo"), Some(clock.now_millis()));
    }

    #[test]
    fn increments_once_drawn_interval_elapses() {
        // interval draws: 0.5 -> 3 days
        let (clock, growth, mut counters) = setup(Arc::new(ScriptedRandom::constant(0.5)));
        growth.should_increment(&mut counters, "demo").expect("first");
        let started = clock.now_millis();

        clock.advance(DAY * 2);
        assert!(!growth.should_increment(&mut counters, "demo").expect("two days"));
        assert_eq!(counters.last_increment("demo"), Some(started));

        clock.advance(DAY);
        assert!(growth.should_increment(&mut counters, "demo").expect("three days"));
        assert_eq!(counters.last_increment("demo"), Some(clock.now_millis()));

        assert!(!growth.should_increment(&mut counters, "demo").expect("right after"));
    }

    #[test]
    fn interval_is_redrawn_each_call() {
        // 0.9 -> 3.8 days, then 0.1 -> 2.2 days
        let random = Arc::new(ScriptedRandom::new([0.9, 0.1]));
        let (clock, growth, mut counters) = setup(random);
        counters.set_last_increment("demo", clock.now_millis()).expect("seed timestamp");
        clock.advance(DAY * 3);
        assert!(!growth.should_increment(&mut counters, "demo").expect("first draw"));
        assert!(growth.should_increment(&mut counters, "demo").expect("second draw"));
    }

    #[test]
    fn never_increments_before_two_days() {
        let (clock, growth, mut counters) = setup(Arc::new(ScriptedRandom::constant(0.0)));
        counters.set_last_increment("demo", clock.now_millis()).expect("seed timestamp");
        clock.advance(DAY * 2 - Duration::from_millis(1));
        assert!(!growth.should_increment(&mut counters, "demo").expect("check"));
    }

    #[test]
    fn future_timestamp_does_not_increment() {
        let (clock, growth, mut counters) = setup(Arc::new(ThreadRandom));
        counters
            .set_last_increment("demo", clock.now_millis() + 10 * 86_400_000)
            .expect("seed timestamp");
        assert!(!growth.should_increment(&mut counters, "demo").expect("check"));
    }

    #[test]
    fn extreme_stored_timestamps_do_not_overflow() {
        let (_clock, growth, mut counters) = setup(Arc::new(ScriptedRandom::constant(0.5)));
        counters.set_last_increment("ancient", i64::MIN).expect("seed timestamp");
        assert!(growth.should_increment(&mut counters, "ancient").expect("ancient"));

        counters.set_last_increment("far-future", i64::MAX).expect("seed timestamp");
        assert!(!growth.should_increment(&mut counters, "far-future").expect("far future"));
    }

    #[test]
    fn apply_increment_adds_one_to_five() {
        for _ in 0..100 {
            let (_clock, growth, mut counters) = setup(Arc::new(ThreadRandom));
            let before = counters.get("boeing").expect("get");
            let after = growth.apply_increment(&mut counters, "boeing").expect("increment");
            assert!(INCREMENT_RANGE.contains(&(after - before)));
            assert_eq!(counters.get("boeing").expect("get"), after);
        }
    }

    #[test]
    fn apply_increment_bounds_follow_random_extremes() {
        let (_clock, growth, mut counters) = setup(Arc::new(ScriptedRandom::constant(0.0)));
        counters.set("demo", 10).expect("set");
        assert_eq!(growth.apply_increment(&mut counters, "demo").expect("low"), 11);

        let (_clock, growth, mut counters) = setup(Arc::new(ScriptedRandom::constant(1.0)));
        counters.set("demo", 10).expect("set");
        assert_eq!(growth.apply_increment(&mut counters, "demo").expect("high"), 15);
    }

    #[test]
    fn observe_returns_stored_value_until_due() {
        let (clock, growth, mut counters) = setup(Arc::new(ScriptedRandom::constant(0.0)));
        assert_eq!(growth.observe(&mut counters, "BondTracker").expect("first"), 89);
        assert_eq!(growth.observe(&mut counters, "BondTracker").expect("same day"), 89);
        clock.advance(DAY * 2);
        assert_eq!(growth.observe(&mut counters, "BondTracker").expect("due"), 90);
    }
}
