//! HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;

use calibration_tracker::domain::ImportFieldMapping;
use calibration_tracker::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) import_mapping: Arc<ImportFieldMapping>,
    pub(crate) upload_limit_bytes: usize,
}

impl ServerConfig {
    /// Configuration binding `bind_addr` with an in-memory store.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, upload_limit_bytes: usize) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            import_mapping: Arc::new(ImportFieldMapping::default()),
            upload_limit_bytes,
        }
    }

    /// Persist devices through `pool` instead of process memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Replace the default import field mapping.
    #[must_use]
    pub fn with_import_mapping(mut self, mapping: ImportFieldMapping) -> Self {
        self.import_mapping = Arc::new(mapping);
        self
    }
}
