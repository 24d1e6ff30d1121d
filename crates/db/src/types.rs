/// Input for [`crate::Db::record_view`]. `ip_hash` must already be hashed.
#[derive(Debug, Clone)]
pub struct NewPageView {
    pub project_id: String,
    pub ip_hash: String,
    pub user_agent: String,
    pub referrer: String,
    pub ts: String,
}
