use chrono::{DateTime, Utc};
use filmlink_core::{Config, LookupService, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    lookup: LookupService,
    started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: Config, lookup: LookupService) -> Self {
        Self {
            config,
            lookup,
            started_at: Utc::now(),
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn lookup(&self) -> &LookupService {
        &self.lookup
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}
