//! PostgreSQL-backed `DeviceRepository` implementation using Diesel ORM.
//!
//! Completions run inside one transaction: the device update and the history
//! insert commit together or not at all.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{DeviceRepository, DeviceRepositoryError};
use crate::domain::{
    CompletionUpdate, Device, DeviceId, HistoryEntry, NewDevice, RecordedCompletion,
};

use super::models::{DeviceRow, HistoryRow, NewDeviceRow, NewHistoryRow};
use super::pool::{DbPool, PoolError};
use super::schema::{device_history, devices};

/// Diesel-backed implementation of the device repository port.
///
/// # Examples
///
/// ```rust,no_run
/// use calibration_tracker::outbound::persistence::{DbPool, DieselDeviceRepository, PoolConfig};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = DbPool::new(PoolConfig::new("postgres://localhost/calibration")).await?;
/// let repository = DieselDeviceRepository::new(pool);
/// # let _ = repository;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct DieselDeviceRepository {
    pool: DbPool,
}

impl DieselDeviceRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DeviceRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            DeviceRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: DieselError) -> DeviceRepositoryError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, info) => {
            DeviceRepositoryError::connection(info.message().to_owned())
        }
        DieselError::DatabaseError(_, info) => {
            DeviceRepositoryError::query(info.message().to_owned())
        }
        other => DeviceRepositoryError::query(other.to_string()),
    }
}

#[async_trait]
impl DeviceRepository for DieselDeviceRepository {
    async fn insert(&self, device: &NewDevice) -> Result<DeviceId, DeviceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(devices::table)
            .values(NewDeviceRow::from(device))
            .returning(devices::id)
            .get_result::<i64>(&mut conn)
            .await
            .map(DeviceId::new)
            .map_err(map_diesel_error)
    }

    async fn list_all(&self) -> Result<Vec<Device>, DeviceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<DeviceRow> = devices::table
            .order(devices::id.asc())
            .select(DeviceRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(Device::from).collect())
    }

    async fn find_by_id(&self, id: DeviceId) -> Result<Option<Device>, DeviceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = devices::table
            .find(id.get())
            .select(DeviceRow::as_select())
            .first::<DeviceRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(Device::from))
    }

    async fn apply_completion(
        &self,
        update: &CompletionUpdate,
    ) -> Result<RecordedCompletion, DeviceRepositoryError> {
        let device_id = update.device_id();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let (device_row, history_row) = conn
            .transaction(|conn| {
                async move {
                    let device_row = diesel::update(devices::table.find(device_id.get()))
                        .set((
                            devices::last_calibration.eq(Some(update.completed_on())),
                            devices::next_due.eq(Some(update.next_due())),
                        ))
                        .returning(DeviceRow::as_returning())
                        .get_result::<DeviceRow>(conn)
                        .await?;

                    let history_row = diesel::insert_into(device_history::table)
                        .values(NewHistoryRow {
                            device_id: device_id.get(),
                            performed_on: update.completed_on(),
                            action: update.action(),
                            note: update.note(),
                        })
                        .returning(HistoryRow::as_returning())
                        .get_result::<HistoryRow>(conn)
                        .await?;

                    Ok::<_, DieselError>((device_row, history_row))
                }
                .scope_boxed()
            })
            .await
            .map_err(|error| match error {
                DieselError::NotFound => DeviceRepositoryError::device_not_found(device_id),
                other => map_diesel_error(other),
            })?;

        Ok(RecordedCompletion {
            device: device_row.into(),
            entry: history_row.into(),
        })
    }

    async fn list_history(&self, id: DeviceId) -> Result<Vec<HistoryEntry>, DeviceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<HistoryRow> = device_history::table
            .filter(device_history::device_id.eq(id.get()))
            .order(device_history::id.asc())
            .select(HistoryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(HistoryEntry::from).collect())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for Diesel error mapping.
    use rstest::rstest;

    use super::*;

    #[rstest]
    fn pool_errors_are_connection_failures() {
        let error = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(error, DeviceRepositoryError::connection("timed out"));
    }

    #[rstest]
    fn not_found_outside_transactions_is_a_query_failure() {
        let error = map_diesel_error(DieselError::NotFound);
        assert!(matches!(error, DeviceRepositoryError::Query { .. }));
    }
}
