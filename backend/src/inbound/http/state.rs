//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{DeadlineQuery, DeviceCommand, DeviceImportCommand, DeviceQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub devices: Arc<dyn DeviceCommand>,
    pub devices_query: Arc<dyn DeviceQuery>,
    pub deadlines: Arc<dyn DeadlineQuery>,
    pub imports: Arc<dyn DeviceImportCommand>,
}

impl HttpState {
    /// Bundle the driving ports consumed by the handlers.
    pub fn new(
        devices: Arc<dyn DeviceCommand>,
        devices_query: Arc<dyn DeviceQuery>,
        deadlines: Arc<dyn DeadlineQuery>,
        imports: Arc<dyn DeviceImportCommand>,
    ) -> Self {
        Self {
            devices,
            devices_query,
            deadlines,
            imports,
        }
    }
}
