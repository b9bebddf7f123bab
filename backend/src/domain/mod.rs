//! Domain primitives, calibration rules and application services.
//!
//! Purpose: keep the registry, the scheduler and the import rules free of
//! transport and storage concerns. Adapters talk to this module only through
//! the traits in [`ports`].
//!
//! Public surface:
//! - [`Device`], [`NewDevice`], [`HistoryEntry`]: registry records.
//! - [`classify`], [`next_due_date`], [`years_from_cycle_text`]: scheduler.
//! - [`ImportFieldMapping`]: spreadsheet column configuration.
//! - [`DeviceRegistryService`], [`DeadlineTrackerService`],
//!   [`DeviceImportService`]: driving port implementations.

pub mod calibration;
pub mod deadline;
pub mod deadline_tracker_service;
pub mod device;
pub mod device_import_service;
pub mod device_registry_service;
pub mod error;
pub mod import;
pub mod ports;
pub mod trace_id;

pub use self::calibration::{
    DAYS_PER_CYCLE_YEAR, DUE_SOON_WINDOW_DAYS, MAX_CYCLE_YEARS, Urgency, classify, days_remaining,
    next_due_date, years_from_cycle_text,
};
pub use self::deadline::{
    DashboardSummary, DeadlineEntry, DepartmentCount, DepartmentFilter, StatusBucket,
    deadline_entries, summarize,
};
pub use self::deadline_tracker_service::DeadlineTrackerService;
pub use self::device::{
    COMPLETION_ACTION_LABEL, CompletionUpdate, DEFAULT_CYCLE_TEXT, DEFAULT_DEVICE_STATUS, Device,
    DeviceFormDefaults, DeviceId, DeviceValidationError, HistoryEntry, NewDevice,
    RecordedCompletion, STANDARD_CYCLE_OPTIONS,
};
pub use self::device_import_service::DeviceImportService;
pub use self::device_registry_service::DeviceRegistryService;
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::import::{
    ImportColumns, ImportFailure, ImportFieldMapping, ImportOutcome, ImportPreview, ImportRow,
    PREVIEW_ROW_LIMIT, PreviewRow, RawTable, SkipReason, parse_import_date,
};
pub use self::trace_id::TraceId;

/// Current calendar date at the facility.
///
/// Classification and completion defaults compare dates, never times of day,
/// so every service derives "today" through this helper.
pub(crate) fn today(clock: &dyn mockable::Clock) -> chrono::NaiveDate {
    clock.local().date_naive()
}
