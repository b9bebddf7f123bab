//! Dashboard and deadline tracker service.
//!
//! Nothing is cached: every call re-reads the registry and classifies against
//! today's date.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::device_registry_service::map_repository_error;
use crate::domain::ports::{DeadlineQuery, DeviceRepository};
use crate::domain::{
    DashboardSummary, DeadlineEntry, DepartmentFilter, Error, deadline_entries, summarize, today,
};

/// Service implementing [`DeadlineQuery`].
#[derive(Clone)]
pub struct DeadlineTrackerService<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> DeadlineTrackerService<R> {
    /// Create a tracker reading from `repo` and classifying against `clock`.
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

#[async_trait]
impl<R> DeadlineQuery for DeadlineTrackerService<R>
where
    R: DeviceRepository,
{
    async fn dashboard(&self, filter: &DepartmentFilter) -> Result<DashboardSummary, Error> {
        let mut devices = self.repo.list_all().await.map_err(map_repository_error)?;
        devices.retain(|device| filter.matches(device));
        let summary = summarize(&devices, today(self.clock.as_ref()));
        debug!(
            total = summary.total,
            overdue = summary.overdue,
            due_soon = summary.due_soon,
            "dashboard computed"
        );
        Ok(summary)
    }

    async fn deadlines(&self) -> Result<Vec<DeadlineEntry>, Error> {
        let devices = self.repo.list_all().await.map_err(map_repository_error)?;
        Ok(deadline_entries(devices, today(self.clock.as_ref())))
    }
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeDelta};
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::ports::{DeviceRepositoryError, MockDeviceRepository};
    use crate::domain::{Device, DeviceId, ErrorCode, Urgency};
    use crate::test_support::{FixedClock, new_device};

    #[fixture]
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).expect("valid date")
    }

    fn due_in(id: i64, department: &str, today: NaiveDate, days: i64) -> Device {
        let mut new = new_device(&format!("device-{id}"), department);
        new.next_due = Some(today + TimeDelta::days(days));
        Device::register(DeviceId::new(id), new)
    }

    fn make_service(devices: Vec<Device>, today: NaiveDate) -> DeadlineTrackerService<MockDeviceRepository> {
        let mut repo = MockDeviceRepository::new();
        repo.expect_list_all().return_once(move || Ok(devices));
        DeadlineTrackerService::new(Arc::new(repo), Arc::new(FixedClock::on(today)))
    }

    #[rstest]
    #[tokio::test]
    async fn deadlines_sort_by_days_remaining(today: NaiveDate) {
        let service = make_service(
            vec![
                due_in(1, "ICU", today, 40),
                due_in(2, "ICU", today, -5),
                due_in(3, "Lab", today, 10),
            ],
            today,
        );
        let entries = service.deadlines().await.expect("deadlines");
        let days: Vec<_> = entries.iter().filter_map(|e| e.days_remaining).collect();
        assert_eq!(days, [-5, 10, 40]);
        assert_eq!(entries.first().map(|e| e.urgency), Some(Urgency::Overdue));
    }

    #[rstest]
    #[tokio::test]
    async fn dashboard_respects_filter(today: NaiveDate) {
        let service = make_service(
            vec![
                due_in(1, "ICU", today, -1),
                due_in(2, "Lab", today, 5),
                due_in(3, "ICU", today, 90),
            ],
            today,
        );
        let summary = service
            .dashboard(&DepartmentFilter::Only("ICU".to_owned()))
            .await
            .expect("dashboard");
        assert_eq!((summary.total, summary.overdue, summary.due_soon, summary.safe), (2, 1, 0, 1));
    }

    #[rstest]
    #[tokio::test]
    async fn store_outage_is_service_unavailable(today: NaiveDate) {
        let mut repo = MockDeviceRepository::new();
        repo.expect_list_all()
            .return_once(|| Err(DeviceRepositoryError::connection("down")));
        let service = DeadlineTrackerService::new(Arc::new(repo), Arc::new(FixedClock::on(today)));
        let error = service.deadlines().await.expect_err("outage");
        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }
}
