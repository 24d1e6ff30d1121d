use std::path::PathBuf;

use crate::error::{AppError, Result};
use crate::services::AppServices;
use portfolio_db::Db;

/// Settings needed to run the analytics backend.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub seed_defaults: bool,
}

/// Application state shared by the transport layers.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub services: AppServices,
}

impl AppState {
    pub fn new(db_path: PathBuf, seed_defaults: bool) -> Self {
        let config = AppConfig {
            db_path,
            seed_defaults,
        };
        let services = AppServices::new(&config);
        Self { config, services }
    }

    pub fn is_fresh_db(&self) -> bool {
        !self.config.db_path.exists()
    }

    pub fn setup_db(&self) -> Result<()> {
        setup_db(&self.config.db_path)
    }

    pub fn initialize(&self) -> Result<()> {
        self.setup_db()
            .map_err(|err| AppError::Message(format!("initialize db: {}", err)))?;
        if self.config.seed_defaults {
            let inserted = self.open_db()?.seed_defaults()?;
            tracing::info!(inserted, "applied default counters");
        }
        self.services.analytics.warm_salt()?;
        Ok(())
    }

    pub fn open_db(&self) -> Result<Db> {
        Ok(Db::open(&self.config.db_path)?)
    }
}

pub fn setup_db(path: &std::path::Path) -> Result<()> {
    let mut db = Db::open(path)?;
    db.migrate()?;
    Ok(())
}
