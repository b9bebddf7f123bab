//! Builders wiring domain services onto the configured repository.

use std::sync::Arc;

use calibration_tracker::domain::ports::DeviceRepository;
use calibration_tracker::domain::{
    DeadlineTrackerService, DeviceImportService, DeviceRegistryService,
};
use calibration_tracker::inbound::http::state::HttpState;
use calibration_tracker::outbound::memory::InMemoryDeviceRepository;
use calibration_tracker::outbound::persistence::DieselDeviceRepository;
use calibration_tracker::outbound::spreadsheet::SpreadsheetFileReader;
use mockable::{Clock, DefaultClock};
use tracing::warn;

use super::ServerConfig;

/// Build handler state over PostgreSQL when a pool is configured, otherwise
/// over an in-memory store.
pub(crate) fn build_http_state(config: &ServerConfig) -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    match &config.db_pool {
        Some(pool) => services_over(
            Arc::new(DieselDeviceRepository::new(pool.clone())),
            config,
            clock,
        ),
        None => {
            warn!("no database configured; devices are kept in memory and lost on restart");
            services_over(Arc::new(InMemoryDeviceRepository::new()), config, clock)
        }
    }
}

fn services_over<R>(repo: Arc<R>, config: &ServerConfig, clock: Arc<dyn Clock>) -> HttpState
where
    R: DeviceRepository + 'static,
{
    let registry = Arc::new(DeviceRegistryService::new(repo.clone(), clock.clone()));
    let deadlines = Arc::new(DeadlineTrackerService::new(repo.clone(), clock.clone()));
    let imports = Arc::new(DeviceImportService::new(
        repo,
        Arc::new(SpreadsheetFileReader),
        config.import_mapping.clone(),
        clock,
    ));
    HttpState::new(registry.clone(), registry, deadlines, imports)
}
