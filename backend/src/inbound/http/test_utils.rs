//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use chrono::NaiveDate;

use super::state::HttpState;
use crate::domain::{
    DeadlineTrackerService, DeviceImportService, DeviceRegistryService, ImportFieldMapping,
};
use crate::outbound::memory::InMemoryDeviceRepository;
use crate::outbound::spreadsheet::SpreadsheetFileReader;
use crate::test_support::FixedClock;

/// Handler state wired to real services over an in-memory store.
///
/// The repository is returned alongside so tests can seed or inspect it.
pub fn memory_state(today: NaiveDate) -> (HttpState, Arc<InMemoryDeviceRepository>) {
    let repo = Arc::new(InMemoryDeviceRepository::new());
    let clock = Arc::new(FixedClock::on(today));
    let registry = Arc::new(DeviceRegistryService::new(repo.clone(), clock.clone()));
    let deadlines = Arc::new(DeadlineTrackerService::new(repo.clone(), clock.clone()));
    let imports = Arc::new(DeviceImportService::new(
        repo.clone(),
        Arc::new(SpreadsheetFileReader),
        Arc::new(ImportFieldMapping::default()),
        clock,
    ));
    let state = HttpState::new(registry.clone(), registry, deadlines, imports);
    (state, repo)
}

/// Date used by handler tests as "today".
pub fn test_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 15).expect("valid date")
}
