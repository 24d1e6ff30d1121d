mod analytics;
mod reactions;

use std::sync::Arc;

use crate::app::AppConfig;
use crate::error::{AppError, Result};
use portfolio_core::is_valid_project_id;
use portfolio_db::Db;

pub use analytics::AnalyticsService;
pub use reactions::{ReactionsService, ReactionsSummary};

type SharedConfig = Arc<AppConfig>;

/// Service registry for app-level operations.
#[derive(Clone)]
pub struct AppServices {
    pub analytics: AnalyticsService,
    pub reactions: ReactionsService,
}

impl AppServices {
    pub fn new(config: &AppConfig) -> Self {
        let shared = Arc::new(config.clone());
        Self {
            analytics: AnalyticsService::new(shared.clone()),
            reactions: ReactionsService::new(shared),
        }
    }
}

fn open_db(config: &SharedConfig) -> Result<Db> {
    Ok(Db::open(&config.db_path)?)
}

fn require_project_id(project_id: &str) -> Result<()> {
    if is_valid_project_id(project_id) {
        Ok(())
    } else {
        Err(AppError::InvalidInput(format!(
            "invalid project id {:?}",
            project_id
        )))
    }
}
