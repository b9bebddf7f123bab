//! Driving port for registry reads.

use async_trait::async_trait;

use crate::domain::{DepartmentFilter, Device, DeviceId, Error, HistoryEntry};

/// Registry reads backing the listing view.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceQuery: Send + Sync {
    /// Devices passing `filter`, in insertion order.
    async fn list_devices(&self, filter: &DepartmentFilter) -> Result<Vec<Device>, Error>;

    /// One device, or `not_found`.
    async fn find_device(&self, id: DeviceId) -> Result<Device, Error>;

    /// Distinct non-empty departments in first-seen order.
    async fn departments(&self) -> Result<Vec<String>, Error>;

    /// History of one device, oldest first, or `not_found`.
    async fn history(&self, id: DeviceId) -> Result<Vec<HistoryEntry>, Error>;
}
