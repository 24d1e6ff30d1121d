use serde::Deserialize;

/// Who viewed a page, as seen by the transport layer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordViewRequest {
    pub client_identifier: String,
    #[serde(default)]
    pub user_agent: String,
    #[serde(default)]
    pub referrer: String,
}
