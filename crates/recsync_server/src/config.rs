//! Server configuration.

use recsync_engine::EngineConfig;
use recsync_protocol::MAX_POINTERS_PER_REQUEST;

/// Configuration for request handling.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Maximum pointers in one GetRecords request (never above 100).
    pub max_pointers_per_request: usize,
    /// Maximum operations in one transaction.
    pub max_operations_per_transaction: usize,
    /// Engine configuration.
    pub engine: EngineConfig,
}

impl ServerConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self {
            max_pointers_per_request: MAX_POINTERS_PER_REQUEST,
            max_operations_per_transaction: 1000,
            engine: EngineConfig::default(),
        }
    }

    /// Sets the maximum pointers per GetRecords request, clamped to 100.
    pub fn with_max_pointers(mut self, max: usize) -> Self {
        self.max_pointers_per_request = max.min(MAX_POINTERS_PER_REQUEST);
        self
    }

    /// Sets the maximum operations per transaction.
    pub fn with_max_operations(mut self, max: usize) -> Self {
        self.max_operations_per_transaction = max;
        self
    }

    /// Sets the engine configuration.
    pub fn with_engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new()
    }
}
