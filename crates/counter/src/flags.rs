use serde::{Deserialize, Serialize};

/// Feature switches handed to client components at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    pub remote_tracking: bool,
    pub admin_panel: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            remote_tracking: false,
            admin_panel: cfg!(debug_assertions),
        }
    }
}

impl FeatureFlags {
    pub fn with_remote_tracking(mut self, enabled: bool) -> Self {
        self.remote_tracking = enabled;
        self
    }

    pub fn with_admin_panel(mut self, enabled: bool) -> Self {
        self.admin_panel = enabled;
        self
    }
}
