use portfolio_app::ReactionsSummary;
use portfolio_core::AnalyticsRecord;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ViewCountResponse {
    pub project_id: String,
    pub view_count: u64,
    pub unique_visitors: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordViewResponse {
    pub success: bool,
    pub view_count: u64,
    pub unique_visitors: u64,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsSummaryResponse {
    pub analytics: Vec<AnalyticsRecord>,
}

#[derive(Debug, Serialize)]
pub struct ReactionChangeResponse {
    pub success: bool,
    pub project_id: String,
    pub reaction_type: String,
    pub new_count: u64,
}

#[derive(Debug, Serialize)]
pub struct ReactionsSummaryResponse {
    pub reactions_summary: ReactionsSummary,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
