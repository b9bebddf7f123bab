//! Registry records: devices, their history entries and completion updates.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Status assigned to every newly registered device.
pub const DEFAULT_DEVICE_STATUS: &str = "active";

/// Cycle text used when a record does not supply one.
pub const DEFAULT_CYCLE_TEXT: &str = "1 Năm/ Lần";

/// Cycle labels offered by the manual entry form.
pub const STANDARD_CYCLE_OPTIONS: [&str; 3] = ["1 Năm/ Lần", "2 Năm/ Lần", "3 Năm/ Lần"];

/// Action recorded on every history entry created by a completion event.
pub const COMPLETION_ACTION_LABEL: &str = "calibration/maintenance completed";

/// Store-assigned device identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct DeviceId(i64);

impl DeviceId {
    /// Wrap a raw store identifier.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw store identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for DeviceId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// Validation failures for [`NewDevice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DeviceValidationError {
    /// The device name is empty once trimmed.
    #[error("device name must not be blank")]
    BlankName,
}

/// Attributes of a device before the store assigns an id and status.
///
/// Duplicate names and serials are accepted; re-registering a near-identical
/// asset is routine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewDevice {
    /// Equipment name.
    pub name: String,
    /// Department or location the device is placed in.
    #[serde(default)]
    pub department: String,
    /// Manufacturer model.
    #[serde(default)]
    pub model: String,
    /// Serial number.
    #[serde(default)]
    pub serial: String,
    /// Free-text calibration cycle, for example `"2 Năm/ Lần"`.
    #[serde(default = "default_cycle")]
    pub cycle: String,
    /// Date of the last calibration.
    #[serde(default)]
    pub last_calibration: Option<NaiveDate>,
    /// Date the next calibration is due.
    #[serde(default)]
    pub next_due: Option<NaiveDate>,
    /// Person responsible for the device.
    #[serde(default)]
    pub responsible: String,
}

fn default_cycle() -> String {
    DEFAULT_CYCLE_TEXT.to_owned()
}

impl NewDevice {
    /// Check the single registration rule: a device needs a name.
    ///
    /// # Errors
    /// Returns [`DeviceValidationError::BlankName`] for an empty or
    /// whitespace-only name.
    pub fn validate(&self) -> Result<(), DeviceValidationError> {
        if self.name.trim().is_empty() {
            return Err(DeviceValidationError::BlankName);
        }
        Ok(())
    }
}

/// A registered piece of equipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Store-assigned identifier.
    pub id: DeviceId,
    /// Equipment name.
    pub name: String,
    /// Department or location the device is placed in.
    pub department: String,
    /// Manufacturer model.
    pub model: String,
    /// Serial number.
    pub serial: String,
    /// Free-text calibration cycle.
    pub cycle: String,
    /// Date of the last completed calibration.
    pub last_calibration: Option<NaiveDate>,
    /// Date the next calibration is due.
    pub next_due: Option<NaiveDate>,
    /// Person responsible for the device.
    pub responsible: String,
    /// Lifecycle status; `active` on registration.
    pub status: String,
}

impl Device {
    /// Build the stored form of `new` under `id` with the default status.
    #[must_use]
    pub fn register(id: DeviceId, new: NewDevice) -> Self {
        Self {
            id,
            name: new.name,
            department: new.department,
            model: new.model,
            serial: new.serial,
            cycle: new.cycle,
            last_calibration: new.last_calibration,
            next_due: new.next_due,
            responsible: new.responsible,
            status: DEFAULT_DEVICE_STATUS.to_owned(),
        }
    }
}

/// Immutable record of one completion event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Store-assigned identifier.
    pub id: i64,
    /// Device the event belongs to.
    pub device_id: DeviceId,
    /// Date the work was carried out.
    pub performed_on: NaiveDate,
    /// What was done.
    pub action: String,
    /// Operator note, possibly empty.
    pub note: String,
}

/// Both halves of a completion event, applied by the store as one unit.
///
/// The history entry always carries the same date as the new
/// `last_calibration`, so the fields are private and set together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionUpdate {
    device_id: DeviceId,
    completed_on: NaiveDate,
    next_due: NaiveDate,
    note: String,
}

impl CompletionUpdate {
    /// Describe a completion of `device_id` on `completed_on`.
    pub fn new(
        device_id: DeviceId,
        completed_on: NaiveDate,
        next_due: NaiveDate,
        note: impl Into<String>,
    ) -> Self {
        Self {
            device_id,
            completed_on,
            next_due,
            note: note.into(),
        }
    }

    /// Device being completed.
    #[must_use]
    pub fn device_id(&self) -> DeviceId {
        self.device_id
    }

    /// New last-calibration date and history execution date.
    #[must_use]
    pub fn completed_on(&self) -> NaiveDate {
        self.completed_on
    }

    /// New next-due date.
    #[must_use]
    pub fn next_due(&self) -> NaiveDate {
        self.next_due
    }

    /// Operator note for the history entry.
    #[must_use]
    pub fn note(&self) -> &str {
        &self.note
    }

    /// Action label written to the history entry.
    #[must_use]
    pub fn action(&self) -> &'static str {
        COMPLETION_ACTION_LABEL
    }

    /// Apply the date change to `device` in place.
    pub fn apply_to(&self, device: &mut Device) {
        device.last_calibration = Some(self.completed_on);
        device.next_due = Some(self.next_due);
    }
}

/// Result of a completion event: the updated device and its new history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordedCompletion {
    /// Device with both dates moved.
    pub device: Device,
    /// History entry written by the completion.
    pub entry: HistoryEntry,
}

/// Values pre-filled in the manual entry form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeviceFormDefaults {
    /// Cycle labels offered for selection.
    pub cycle_options: Vec<String>,
    /// Cycle pre-selected for a new device.
    pub default_cycle: String,
    /// Status every new device receives.
    pub default_status: String,
}

impl Default for DeviceFormDefaults {
    fn default() -> Self {
        Self {
            cycle_options: STANDARD_CYCLE_OPTIONS.iter().map(|&c| c.to_owned()).collect(),
            default_cycle: DEFAULT_CYCLE_TEXT.to_owned(),
            default_status: DEFAULT_DEVICE_STATUS.to_owned(),
        }
    }
}
