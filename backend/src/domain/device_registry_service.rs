//! Device registry service.
//!
//! Implements the registry driving ports over a [`DeviceRepository`]. The
//! completion flow reads the device's cycle text, rolls the next-due date
//! forward and hands both writes to the repository as one unit.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{
    CompletionRequest, DeviceCommand, DeviceQuery, DeviceRepository, DeviceRepositoryError,
};
use crate::domain::{
    CompletionUpdate, DepartmentFilter, Device, DeviceId, Error, HistoryEntry, NewDevice,
    RecordedCompletion, next_due_date, today,
};

pub(crate) fn map_repository_error(error: DeviceRepositoryError) -> Error {
    match error {
        DeviceRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("device repository unavailable: {message}"))
        }
        DeviceRepositoryError::Query { message } => {
            Error::internal(format!("device repository error: {message}"))
        }
        DeviceRepositoryError::DeviceNotFound { device_id } => device_not_found(device_id),
    }
}

fn device_not_found(id: DeviceId) -> Error {
    Error::not_found(format!("device {id} not found"))
}

/// Registry service implementing [`DeviceCommand`] and [`DeviceQuery`].
#[derive(Clone)]
pub struct DeviceRegistryService<R> {
    repo: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> DeviceRegistryService<R> {
    /// Create a registry service; `clock` supplies the default completion date.
    pub fn new(repo: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repo, clock }
    }
}

impl<R> DeviceRegistryService<R>
where
    R: DeviceRepository,
{
    async fn require_device(&self, id: DeviceId) -> Result<Device, Error> {
        self.repo
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| device_not_found(id))
    }
}

#[async_trait]
impl<R> DeviceCommand for DeviceRegistryService<R>
where
    R: DeviceRepository,
{
    async fn create_device(&self, device: NewDevice) -> Result<(), Error> {
        device
            .validate()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let id = self
            .repo
            .insert(&device)
            .await
            .map_err(map_repository_error)?;
        info!(device_id = %id, name = %device.name, "device registered");
        Ok(())
    }

    async fn record_completion(
        &self,
        request: CompletionRequest,
    ) -> Result<RecordedCompletion, Error> {
        let device = self.require_device(request.device_id).await?;
        let completed_on = request
            .completed_on
            .unwrap_or_else(|| today(self.clock.as_ref()));
        let next_due = next_due_date(completed_on, &device.cycle).ok_or_else(|| {
            Error::invalid_request(format!(
                "next due date for device {} is out of range",
                device.id
            ))
        })?;

        let update = CompletionUpdate::new(device.id, completed_on, next_due, request.note);
        let recorded = self
            .repo
            .apply_completion(&update)
            .await
            .map_err(map_repository_error)?;
        info!(
            device_id = %device.id,
            %completed_on,
            %next_due,
            history_id = recorded.entry.id,
            "completion recorded"
        );
        Ok(recorded)
    }
}

#[async_trait]
impl<R> DeviceQuery for DeviceRegistryService<R>
where
    R: DeviceRepository,
{
    async fn list_devices(&self, filter: &DepartmentFilter) -> Result<Vec<Device>, Error> {
        let mut devices = self.repo.list_all().await.map_err(map_repository_error)?;
        devices.retain(|device| filter.matches(device));
        debug!(count = devices.len(), ?filter, "devices listed");
        Ok(devices)
    }

    async fn find_device(&self, id: DeviceId) -> Result<Device, Error> {
        self.require_device(id).await
    }

    async fn departments(&self) -> Result<Vec<String>, Error> {
        let devices = self.repo.list_all().await.map_err(map_repository_error)?;
        let mut departments: Vec<String> = Vec::new();
        for device in devices {
            if !device.department.is_empty() && !departments.contains(&device.department) {
                departments.push(device.department);
            }
        }
        Ok(departments)
    }

    async fn history(&self, id: DeviceId) -> Result<Vec<HistoryEntry>, Error> {
        self.require_device(id).await?;
        self.repo
            .list_history(id)
            .await
            .map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "device_registry_service_tests.rs"]
mod tests;
