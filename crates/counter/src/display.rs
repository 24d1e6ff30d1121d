use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::counter_store::CounterStore;
use crate::error::{RemoteError, Result};
use crate::flags::FeatureFlags;
use crate::growth::GrowthSimulator;
use crate::remote::RemoteCounter;
use crate::seams::{Clock, RandomSource};
use crate::store::KeyValueStore;

/// What a project page shows: a count, and whether it came from the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayedCount {
    pub value: u64,
    pub is_live: bool,
}

/// Two-tier view count: the remote counter when it answers, the simulated
/// local counter otherwise. Each call falls back at most once and never
/// retries.
pub struct ViewCountDisplay<R, S> {
    flags: FeatureFlags,
    remote: R,
    counters: CounterStore<S>,
    growth: GrowthSimulator,
    remote_timeout: Duration,
}

impl<R: RemoteCounter, S: KeyValueStore> ViewCountDisplay<R, S> {
    pub fn new(
        flags: FeatureFlags,
        remote: R,
        store: S,
        clock: Arc<dyn Clock>,
        random: Arc<dyn RandomSource>,
    ) -> Self {
        Self {
            flags,
            remote,
            counters: CounterStore::new(store, random.clone()),
            growth: GrowthSimulator::new(clock, random),
            remote_timeout: Duration::from_secs(5),
        }
    }

    pub fn with_remote_timeout(mut self, timeout: Duration) -> Self {
        self.remote_timeout = timeout;
        self
    }

    pub fn counters(&self) -> &CounterStore<S> {
        &self.counters
    }

    pub async fn display_count(
        &mut self,
        project_id: &str,
        record_view: bool,
    ) -> Result<DisplayedCount> {
        let remote = self.remote_count(project_id, record_view).await;
        match remote {
            Ok(value) => Ok(DisplayedCount {
                value,
                is_live: true,
            }),
            Err(RemoteError::Disabled) => self.local_count(project_id),
            Err(err) => {
                tracing::warn!(
                    project_id,
                    error = %err,
                    "remote view count unavailable, using local counter"
                );
                self.local_count(project_id)
            }
        }
    }

    async fn remote_count(
        &self,
        project_id: &str,
        record_view: bool,
    ) -> std::result::Result<u64, RemoteError> {
        if !self.flags.remote_tracking {
            return Err(RemoteError::Disabled);
        }
        let counts = tokio::time::timeout(self.remote_timeout, self.remote.get_count(project_id))
            .await
            .map_err(|_| RemoteError::Timeout)??;
        if record_view {
            // The count already fetched is what gets shown; a failed record
            // does not demote the display to the local tier.
            let recorded = tokio::time::timeout(
                self.remote_timeout,
                self.remote.record_view(project_id),
            )
            .await;
            match recorded {
                Ok(Ok(_)) => {}
                Ok(Err(err)) => tracing::warn!(project_id, error = %err, "page view not recorded"),
                Err(_) => tracing::warn!(project_id, "page view record timed out"),
            }
        }
        Ok(counts.view_count)
    }

    fn local_count(&mut self, project_id: &str) -> Result<DisplayedCount> {
        let value = self.growth.observe(&mut self.counters, project_id)?;
        Ok(DisplayedCount {
            value,
            is_live: false,
        })
    }
}
