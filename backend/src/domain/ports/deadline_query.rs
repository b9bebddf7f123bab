//! Driving port for the dashboard and the deadline tracker.

use async_trait::async_trait;

use crate::domain::{DashboardSummary, DeadlineEntry, DepartmentFilter, Error};

/// Read models computed fresh from today's date on every call.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeadlineQuery: Send + Sync {
    /// Aggregate counts for devices passing `filter`.
    async fn dashboard(&self, filter: &DepartmentFilter) -> Result<DashboardSummary, Error>;

    /// Every device, most urgent first.
    async fn deadlines(&self) -> Result<Vec<DeadlineEntry>, Error>;
}
