use std::path::PathBuf;

use crate::Result;

const DB_FILE_NAME: &str = "portfolio.sqlite";

/// On-disk layout of the analytics backend.
#[derive(Clone, Debug)]
pub struct AppPaths {
    pub app_data_dir: PathBuf,
    pub db_path: PathBuf,
}

impl AppPaths {
    pub fn new(app_data_dir: PathBuf) -> Self {
        let db_path = app_data_dir.join(DB_FILE_NAME);
        Self {
            app_data_dir,
            db_path,
        }
    }
}

pub fn ensure_app_data_dir(paths: &AppPaths) -> Result<()> {
    if !paths.app_data_dir.is_dir() {
        tracing::info!(dir = %paths.app_data_dir.display(), "creating data directory");
        std::fs::create_dir_all(&paths.app_data_dir)?;
    }
    Ok(())
}
