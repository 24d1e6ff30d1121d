pub mod app;
pub mod error;
pub mod services;
pub mod startup;

pub use app::{AppConfig, AppState};
pub use error::{ApiError, AppError, Result};
pub use services::{AnalyticsService, AppServices, ReactionsService, ReactionsSummary};
pub use startup::{AppPaths, ensure_app_data_dir};
