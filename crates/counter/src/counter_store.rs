use std::ops::Range;
use std::sync::Arc;

use crate::error::Result;
use crate::seams::{RandomSource, uniform_u64};
use crate::store::KeyValueStore;

/// Starting counts for the projects the site ships with.
pub const BASE_VIEW_COUNTS: &[(&str, u64)] = &[
    ("PythonMonteCarloBasic", 127),
    ("BondTracker", 89),
    ("mandelbrot-excel", 64),
    ("boeing", 43),
];

/// Seed drawn for project ids missing from [`BASE_VIEW_COUNTS`].
pub const SEED_RANGE: Range<u64> = 15..75;

const VIEW_COUNT_PREFIX: &str = "viewCount_";
const LAST_INCREMENT_PREFIX: &str = "lastIncrement_";

pub fn base_view_count(project_id: &str) -> Option<u64> {
    BASE_VIEW_COUNTS
        .iter()
        .find(|(id, _)| *id == project_id)
        .map(|(_, count)| *count)
}

pub fn view_count_key(project_id: &str) -> String {
    format!("{VIEW_COUNT_PREFIX}{project_id}")
}

pub fn last_increment_key(project_id: &str) -> String {
    format!("{LAST_INCREMENT_PREFIX}{project_id}")
}

/// Per-project counters persisted in a [`KeyValueStore`].
pub struct CounterStore<S> {
    store: S,
    random: Arc<dyn RandomSource>,
}

impl<S: KeyValueStore> CounterStore<S> {
    pub fn new(store: S, random: Arc<dyn RandomSource>) -> Self {
        Self { store, random }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Stored count, or a freshly persisted seed when the project has none.
    pub fn get(&mut self, project_id: &str) -> Result<u64> {
        if let Some(count) = self.stored(project_id) {
            return Ok(count);
        }
        let seed = self.seed_for(project_id);
        self.set(project_id, seed)?;
        Ok(seed)
    }

    /// Stored count without seeding. Unparsable values read as absent.
    pub fn stored(&self, project_id: &str) -> Option<u64> {
        let raw = self.store.get(&view_count_key(project_id))?;
        match raw.trim().parse::<u64>() {
            Ok(count) => Some(count),
            Err(_) => {
                tracing::warn!(project_id, value = %raw, "ignoring unparsable stored view count");
                None
            }
        }
    }

    pub fn set(&mut self, project_id: &str, count: u64) -> Result<()> {
        self.store
            .set(&view_count_key(project_id), &count.to_string())
    }

    /// Drops accumulated growth. Known projects return to their base count;
    /// other ids get a fresh seed since the first one was never recorded.
    pub fn reset(&mut self, project_id: &str) -> Result<u64> {
        let seed = self.seed_for(project_id);
        self.set(project_id, seed)?;
        Ok(seed)
    }

    pub fn last_increment(&self, project_id: &str) -> Option<i64> {
        self.store
            .get(&last_increment_key(project_id))
            .and_then(|raw| raw.trim().parse::<i64>().ok())
    }

    pub fn set_last_increment(&mut self, project_id: &str, millis: i64) -> Result<()> {
        self.store
            .set(&last_increment_key(project_id), &millis.to_string())
    }

    pub fn clear_last_increment(&mut self, project_id: &str) -> Result<()> {
        self.store.remove(&last_increment_key(project_id))
    }

    /// Removes both the count and the increment timestamp.
    pub fn clear(&mut self, project_id: &str) -> Result<()> {
        self.store.remove(&view_count_key(project_id))?;
        self.clear_last_increment(project_id)
    }

    /// Project ids that currently have a stored count or timestamp.
    pub fn tracked_projects(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .store
            .keys()
            .into_iter()
            .filter_map(|key| {
                key.strip_prefix(VIEW_COUNT_PREFIX)
                    .or_else(|| key.strip_prefix(LAST_INCREMENT_PREFIX))
                    .map(str::to_string)
            })
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    fn seed_for(&self, project_id: &str) -> u64 {
        base_view_count(project_id)
            .unwrap_or_else(|| uniform_u64(self.random.as_ref(), SEED_RANGE.start, SEED_RANGE.end))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seams::{ScriptedRandom, ThreadRandom};
    use crate::store::MemoryStore;

    fn counters() -> CounterStore<MemoryStore> {
        CounterStore::new(MemoryStore::new(), Arc::new(ThreadRandom))
    }

    #[test]
    fn known_project_seeds_with_base_count() {
        let mut counters = counters();
        assert_eq!(counters.get("BondTracker").expect("get"), 89);
        assert_eq!(
            counters.store().get("viewCount_BondTracker").as_deref(),
            Some("89")
        );
    }

    #[test]
    fn unknown_project_seed_is_in_range_and_persisted() {
        for _ in 0..50 {
            let mut counters = counters();
            let first = counters.get("fresh-project").expect("get");
            assert!(SEED_RANGE.contains(&first), "seed {} out of range", first);
            assert_eq!(counters.get("fresh-project").expect("get"), first);
        }
    }

    #[test]
    fn seed_uses_injected_random() {
        let mut counters = CounterStore::new(MemoryStore::new(), Arc::new(ScriptedRandom::constant(0.5)));
        assert_eq!(counters.get("fresh-project").expect("get"), 45);
    }

    #[test]
    fn reset_discards_growth() {
        let mut counters = counters();
        counters.set("boeing", 500).expect("set");
        assert_eq!(counters.get("boeing").expect("get"), 500);
        assert_eq!(counters.reset("boeing").expect("reset"), 43);
        assert_eq!(counters.get("boeing").expect("get"), 43);
    }

    #[test]
    fn corrupt_value_is_reseeded() {
        let mut store = MemoryStore::new();
        store.set("viewCount_boeing", "NaN").expect("set");
        let mut counters = CounterStore::new(store, Arc::new(ThreadRandom));
        assert_eq!(counters.get("boeing").expect("get"), 43);
    }

    #[test]
    fn tracked_projects_lists_both_key_kinds() {
        let mut counters = counters();
        counters.set("alpha", 1).expect("set");
        counters.set_last_increment("beta", 10).expect("set");
        counters.set_last_increment("alpha", 10).expect("set");
        assert_eq!(counters.tracked_projects(), vec!["alpha", "beta"]);

        counters.clear("alpha").expect("clear");
        assert_eq!(counters.tracked_projects(), vec!["beta"]);
    }
}
