use app_api::AppContext;

#[derive(Clone)]
pub struct HttpState {
    pub context: AppContext,
    pub allowed_origins: Vec<String>,
    /// Honour `X-Forwarded-For`. Only safe behind a reverse proxy that
    /// overwrites the header; otherwise clients pick their own identity.
    pub trust_forwarded_for: bool,
}

impl HttpState {
    pub fn new(context: AppContext) -> Self {
        Self {
            context,
            allowed_origins: Vec::new(),
            trust_forwarded_for: false,
        }
    }

    pub fn with_allowed_origins(mut self, allowed_origins: Vec<String>) -> Self {
        self.allowed_origins = allowed_origins;
        self
    }

    pub fn with_trusted_forwarded_for(mut self, trusted: bool) -> Self {
        self.trust_forwarded_for = trusted;
        self
    }
}
