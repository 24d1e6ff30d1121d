use std::sync::{Arc, OnceLock};

use chrono::{SecondsFormat, Utc};
use rand::RngCore;

use crate::error::Result;
use crate::services::{SharedConfig, open_db, require_project_id};
use portfolio_core::{AnalyticsRecord, ViewCounts, hash_client_identifier, is_valid_project_id};
use portfolio_db::{Db, NewPageView};

#[derive(Clone)]
pub struct AnalyticsService {
    config: SharedConfig,
    salt: Arc<OnceLock<String>>,
}

impl AnalyticsService {
    pub(super) fn new(config: SharedConfig) -> Self {
        Self {
            config,
            salt: Arc::new(OnceLock::new()),
        }
    }

    fn db(&self) -> Result<Db> {
        open_db(&self.config)
    }

    /// Loads the persisted visitor salt, creating one on first start.
    pub fn warm_salt(&self) -> Result<()> {
        let db = self.db()?;
        self.salt(&db).map(|_| ())
    }

    fn salt(&self, db: &Db) -> Result<String> {
        if let Some(salt) = self.salt.get() {
            return Ok(salt.clone());
        }
        let salt = db.visitor_salt_or_insert(&generate_salt())?;
        let _ = self.salt.set(salt.clone());
        Ok(salt)
    }

    /// Ids that could never have been recorded read as zero, like any other
    /// unknown project.
    pub fn view_counts(&self, project_id: &str) -> Result<ViewCounts> {
        if !is_valid_project_id(project_id) {
            return Ok(ViewCounts::default());
        }
        let db = self.db()?;
        Ok(db.view_counts(project_id)?)
    }

    pub fn record_view(
        &self,
        project_id: &str,
        client_identifier: &str,
        user_agent: &str,
        referrer: &str,
    ) -> Result<ViewCounts> {
        require_project_id(project_id)?;
        let mut db = self.db()?;
        let salt = self.salt(&db)?;
        let view = NewPageView {
            project_id: project_id.to_string(),
            ip_hash: hash_client_identifier(&salt, client_identifier),
            user_agent: user_agent.to_string(),
            referrer: referrer.to_string(),
            ts: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        let counts = db.record_view(&view)?;
        tracing::debug!(
            project_id,
            view_count = counts.view_count,
            unique_visitors = counts.unique_visitors,
            "recorded page view"
        );
        Ok(counts)
    }

    pub fn summary(&self) -> Result<Vec<AnalyticsRecord>> {
        let db = self.db()?;
        Ok(db.analytics_summary()?)
    }
}

fn generate_salt() -> String {
    let mut bytes = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    bytes.iter().map(|byte| format!("{:02x}", byte)).collect()
}
