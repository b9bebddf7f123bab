//! `DeviceRepository` kept in process memory.
//!
//! All state sits behind one mutex, so a completion's device update and
//! history append happen under a single lock acquisition and are observed
//! together.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{DeviceRepository, DeviceRepositoryError};
use crate::domain::{
    CompletionUpdate, Device, DeviceId, HistoryEntry, NewDevice, RecordedCompletion,
};

#[derive(Debug, Default)]
struct State {
    devices: Vec<Device>,
    history: Vec<HistoryEntry>,
    next_device_id: i64,
    next_history_id: i64,
    reject_history: bool,
}

/// Memory-backed device store.
#[derive(Debug, Default)]
pub struct InMemoryDeviceRepository {
    state: Mutex<State>,
}

impl InMemoryDeviceRepository {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose history appends fail, for exercising completion
    /// atomicity.
    #[must_use]
    pub fn rejecting_history() -> Self {
        let repo = Self::default();
        if let Ok(mut state) = repo.state.lock() {
            state.reject_history = true;
        }
        repo
    }

    /// Every history entry across all devices, in append order.
    ///
    /// # Errors
    /// Returns a query error if the store lock is poisoned.
    pub fn all_history(&self) -> Result<Vec<HistoryEntry>, DeviceRepositoryError> {
        Ok(self.lock()?.history.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, DeviceRepositoryError> {
        self.state
            .lock()
            .map_err(|_| DeviceRepositoryError::query("in-memory store lock poisoned"))
    }
}

#[async_trait]
impl DeviceRepository for InMemoryDeviceRepository {
    async fn insert(&self, device: &NewDevice) -> Result<DeviceId, DeviceRepositoryError> {
        let mut state = self.lock()?;
        state.next_device_id += 1;
        let id = DeviceId::new(state.next_device_id);
        state.devices.push(Device::register(id, device.clone()));
        Ok(id)
    }

    async fn list_all(&self) -> Result<Vec<Device>, DeviceRepositoryError> {
        Ok(self.lock()?.devices.clone())
    }

    async fn find_by_id(&self, id: DeviceId) -> Result<Option<Device>, DeviceRepositoryError> {
        Ok(self.lock()?.devices.iter().find(|d| d.id == id).cloned())
    }

    async fn apply_completion(
        &self,
        update: &CompletionUpdate,
    ) -> Result<RecordedCompletion, DeviceRepositoryError> {
        let mut state = self.lock()?;
        let position = state
            .devices
            .iter()
            .position(|d| d.id == update.device_id())
            .ok_or_else(|| DeviceRepositoryError::device_not_found(update.device_id()))?;
        if state.reject_history {
            return Err(DeviceRepositoryError::query("history append rejected"));
        }

        let entry = HistoryEntry {
            id: state.next_history_id + 1,
            device_id: update.device_id(),
            performed_on: update.completed_on(),
            action: update.action().to_owned(),
            note: update.note().to_owned(),
        };
        let device = state
            .devices
            .get_mut(position)
            .ok_or_else(|| DeviceRepositoryError::device_not_found(update.device_id()))?;
        update.apply_to(device);
        let device = device.clone();
        state.next_history_id = entry.id;
        state.history.push(entry.clone());
        Ok(RecordedCompletion { device, entry })
    }

    async fn list_history(&self, id: DeviceId) -> Result<Vec<HistoryEntry>, DeviceRepositoryError> {
        Ok(self
            .lock()?
            .history
            .iter()
            .filter(|entry| entry.device_id == id)
            .cloned()
            .collect())
    }
}
