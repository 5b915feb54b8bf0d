//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::TimetableRepository;
use crate::engine::EngineConfig;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for storage operations
    pub repository: Arc<dyn TimetableRepository>,
    /// Engine tuning used by generation and suggestion endpoints
    pub engine: EngineConfig,
}

impl AppState {
    /// Create a new application state with the given repository and default
    /// engine settings.
    pub fn new(repository: Arc<dyn TimetableRepository>) -> Self {
        Self {
            repository,
            engine: EngineConfig::default(),
        }
    }

    /// Override the engine settings.
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }
}
