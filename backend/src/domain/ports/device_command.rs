//! Driving port for registry writes.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{DeviceId, Error, NewDevice, RecordedCompletion};

/// Operator confirmation that a device was calibrated or maintained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequest {
    /// Device that was calibrated or maintained.
    pub device_id: DeviceId,
    /// Defaults to today when omitted.
    pub completed_on: Option<NaiveDate>,
    /// Operator note stored on the history entry.
    pub note: String,
}

/// Registry mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceCommand: Send + Sync {
    /// Register a device. Callers re-read the listing to learn its id.
    async fn create_device(&self, device: NewDevice) -> Result<(), Error>;

    /// Record a completion event, rolling the next-due date forward.
    async fn record_completion(
        &self,
        request: CompletionRequest,
    ) -> Result<RecordedCompletion, Error>;
}
