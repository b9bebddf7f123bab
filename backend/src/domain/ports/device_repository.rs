//! Driven port for device and history persistence.
//!
//! Adapters store the registry's two tables. The only compound write is
//! [`DeviceRepository::apply_completion`], which must apply the device update
//! and the history insert as one unit.

use async_trait::async_trait;

use crate::domain::{CompletionUpdate, Device, DeviceId, HistoryEntry, NewDevice, RecordedCompletion};

/// Errors raised by device repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeviceRepositoryError {
    /// Repository connection could not be established.
    #[error("device repository connection failed: {message}")]
    Connection { message: String },
    /// Query or mutation failed during execution.
    #[error("device repository query failed: {message}")]
    Query { message: String },
    /// The device referenced by a write does not exist.
    #[error("device {device_id} not found")]
    DeviceNotFound { device_id: DeviceId },
}

impl DeviceRepositoryError {
    /// Maps to `service_unavailable` in the services.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    #[must_use]
    pub const fn device_not_found(device_id: DeviceId) -> Self {
        Self::DeviceNotFound { device_id }
    }
}

/// Port for the device registry store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceRepository: Send + Sync {
    /// Insert a device with the default status, returning its new id.
    async fn insert(&self, device: &NewDevice) -> Result<DeviceId, DeviceRepositoryError>;

    /// Every device in insertion order.
    async fn list_all(&self) -> Result<Vec<Device>, DeviceRepositoryError>;

    /// Fetch one device; `None` when absent.
    async fn find_by_id(&self, id: DeviceId) -> Result<Option<Device>, DeviceRepositoryError>;

    /// Move both calibration dates and append the history entry atomically.
    ///
    /// Fails with [`DeviceRepositoryError::DeviceNotFound`] without writing
    /// anything when the device is absent.
    async fn apply_completion(
        &self,
        update: &CompletionUpdate,
    ) -> Result<RecordedCompletion, DeviceRepositoryError>;

    /// History entries of `id`, oldest first.
    async fn list_history(&self, id: DeviceId) -> Result<Vec<HistoryEntry>, DeviceRepositoryError>;
}
