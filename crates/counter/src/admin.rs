use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::sync::Arc;

use portfolio_core::AnalyticsRecord;
use thiserror::Error;

use crate::counter_store::{BASE_VIEW_COUNTS, CounterStore, base_view_count};
use crate::error::{CounterError, RemoteError};
use crate::flags::FeatureFlags;
use crate::remote::RemoteCounter;
use crate::seams::{RandomSource, uniform_u64};
use crate::store::KeyValueStore;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("admin panel is disabled")]
    Disabled,
    #[error(transparent)]
    Counter(#[from] CounterError),
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error("invalid import payload: {0}")]
    Import(serde_json::Error),
}

pub type AdminResult<T> = std::result::Result<T, AdminError>;

/// Views added to each project by [`AdminPanel::simulate_spike`].
pub const SPIKE_RANGE: RangeInclusive<u64> = 10..=30;

/// Development tooling for reading and overriding both counter tiers.
pub struct AdminPanel<S> {
    flags: FeatureFlags,
    counters: CounterStore<S>,
    random: Arc<dyn RandomSource>,
}

impl<S: KeyValueStore> AdminPanel<S> {
    pub fn new(flags: FeatureFlags, store: S, random: Arc<dyn RandomSource>) -> Self {
        Self {
            flags,
            counters: CounterStore::new(store, random.clone()),
            random,
        }
    }

    fn guard(&self) -> AdminResult<()> {
        if self.flags.admin_panel {
            Ok(())
        } else {
            Err(AdminError::Disabled)
        }
    }

    fn known_projects(&self) -> Vec<String> {
        let mut ids: Vec<String> = BASE_VIEW_COUNTS
            .iter()
            .map(|(id, _)| id.to_string())
            .chain(self.counters.tracked_projects())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    /// Current local counts. Reading does not seed: known projects without a
    /// stored value report their base count, unknown ones are skipped.
    pub fn counts(&self) -> AdminResult<BTreeMap<String, u64>> {
        self.guard()?;
        Ok(self
            .known_projects()
            .into_iter()
            .filter_map(|id| {
                let count = self
                    .counters
                    .stored(&id)
                    .or_else(|| base_view_count(&id))?;
                Some((id, count))
            })
            .collect())
    }

    pub fn get(&mut self, project_id: &str) -> AdminResult<u64> {
        self.guard()?;
        Ok(self.counters.get(project_id)?)
    }

    pub fn set(&mut self, project_id: &str, count: u64) -> AdminResult<()> {
        self.guard()?;
        self.counters.set(project_id, count)?;
        tracing::info!(project_id, count, "set local view count");
        Ok(())
    }

    pub fn reset(&mut self, project_id: &str) -> AdminResult<u64> {
        self.guard()?;
        let count = self.counters.reset(project_id)?;
        tracing::info!(project_id, count, "reset local view count");
        Ok(count)
    }

    /// Forgets the last-increment timestamp so the next visit starts a new
    /// growth window.
    pub fn reset_timer(&mut self, project_id: &str) -> AdminResult<()> {
        self.guard()?;
        Ok(self.counters.clear_last_increment(project_id)?)
    }

    pub fn clear_all(&mut self) -> AdminResult<usize> {
        self.guard()?;
        let ids = self.known_projects();
        for id in &ids {
            self.counters.clear(id)?;
        }
        tracing::info!(projects = ids.len(), "cleared local view counts");
        Ok(ids.len())
    }

    /// Adds an independent random bump from [`SPIKE_RANGE`] to every known
    /// project and returns the new counts.
    pub fn simulate_spike(&mut self) -> AdminResult<BTreeMap<String, u64>> {
        self.guard()?;
        let mut updated = BTreeMap::new();
        for id in self.known_projects() {
            let spike = uniform_u64(
                self.random.as_ref(),
                *SPIKE_RANGE.start(),
                *SPIKE_RANGE.end() + 1,
            );
            let count = self.counters.get(&id)?.saturating_add(spike);
            self.counters.set(&id, count)?;
            updated.insert(id, count);
        }
        tracing::info!(projects = updated.len(), "simulated traffic spike");
        Ok(updated)
    }

    /// JSON object of project id to count, suitable for [`AdminPanel::import`].
    pub fn export(&self) -> AdminResult<String> {
        let counts = self.counts()?;
        serde_json::to_string_pretty(&counts).map_err(|err| CounterError::Serde(err).into())
    }

    pub fn import(&mut self, payload: &str) -> AdminResult<usize> {
        self.guard()?;
        let counts: BTreeMap<String, u64> =
            serde_json::from_str(payload).map_err(AdminError::Import)?;
        for (project_id, count) in &counts {
            self.counters.set(project_id, *count)?;
        }
        Ok(counts.len())
    }

    pub async fn remote_summary<R: RemoteCounter>(
        &self,
        remote: &R,
    ) -> AdminResult<Vec<AnalyticsRecord>> {
        self.guard()?;
        Ok(remote.summary().await?)
    }

    pub fn into_store(self) -> S {
        self.counters.into_inner()
    }
}
