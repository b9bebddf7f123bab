//! Bulk import service.
//!
//! Decodes an upload through a [`SpreadsheetReader`], maps rows with the
//! configured [`ImportFieldMapping`] and registers each accepted row. Rows are
//! independent: nothing is rolled back when a later row fails.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info, warn};

use crate::domain::device_registry_service::map_repository_error;
use crate::domain::import::ExtractedRows;
use crate::domain::ports::{
    DeviceImportCommand, DeviceRepository, SpreadsheetReadError, SpreadsheetReader,
    SpreadsheetUpload,
};
use crate::domain::{
    Error, ImportFailure, ImportFieldMapping, ImportOutcome, ImportPreview, PREVIEW_ROW_LIMIT,
    PreviewRow, today,
};

fn map_read_error(error: SpreadsheetReadError) -> Error {
    Error::invalid_request(error.to_string())
}

/// Service implementing [`DeviceImportCommand`].
#[derive(Clone)]
pub struct DeviceImportService<R, S> {
    repo: Arc<R>,
    reader: Arc<S>,
    mapping: Arc<ImportFieldMapping>,
    clock: Arc<dyn Clock>,
}

impl<R, S> DeviceImportService<R, S> {
    /// Create an import service writing to `repo`.
    pub fn new(
        repo: Arc<R>,
        reader: Arc<S>,
        mapping: Arc<ImportFieldMapping>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repo,
            reader,
            mapping,
            clock,
        }
    }
}

impl<R, S> DeviceImportService<R, S>
where
    S: SpreadsheetReader,
{
    fn rows(&self, upload: &SpreadsheetUpload) -> Result<ExtractedRows, Error> {
        let table = self.reader.read(upload).map_err(map_read_error)?;
        self.mapping
            .extract(&table)
            .map_err(|err| Error::invalid_request(err.to_string()))
    }
}

#[async_trait]
impl<R, S> DeviceImportCommand for DeviceImportService<R, S>
where
    R: DeviceRepository,
    S: SpreadsheetReader,
{
    async fn preview(&self, upload: &SpreadsheetUpload) -> Result<ImportPreview, Error> {
        let extracted = self.rows(upload)?;
        let today = today(self.clock.as_ref());
        let total_rows = extracted.rows.len();
        let rows = extracted
            .rows
            .into_iter()
            .take(PREVIEW_ROW_LIMIT)
            .map(|row| {
                let row_number = row.row_number;
                match row.into_new_device(&self.mapping, today) {
                    Ok(device) => PreviewRow {
                        row_number,
                        device: Some(device),
                        skip_reason: None,
                    },
                    Err(reason) => PreviewRow {
                        row_number,
                        device: None,
                        skip_reason: Some(reason),
                    },
                }
            })
            .collect();
        Ok(ImportPreview {
            headers: extracted.headers,
            total_rows,
            rows,
        })
    }

    async fn import(&self, upload: &SpreadsheetUpload) -> Result<ImportOutcome, Error> {
        let extracted = self.rows(upload)?;
        let today = today(self.clock.as_ref());
        let mut outcome = ImportOutcome::default();

        for row in extracted.rows {
            let row_number = row.row_number;
            let device = match row.into_new_device(&self.mapping, today) {
                Ok(device) => device,
                Err(reason) => {
                    debug!(row_number, ?reason, "import row skipped");
                    outcome.skipped += 1;
                    continue;
                }
            };
            match self.repo.insert(&device).await {
                Ok(id) => {
                    debug!(row_number, device_id = %id, "import row created");
                    outcome.created += 1;
                }
                Err(error) => {
                    let error = map_repository_error(error);
                    warn!(row_number, %error, created = outcome.created, "import stopped");
                    outcome.failure = Some(ImportFailure {
                        row_number,
                        message: error.message().to_owned(),
                    });
                    break;
                }
            }
        }

        info!(
            file_name = %upload.file_name,
            created = outcome.created,
            skipped = outcome.skipped,
            failed = outcome.failure.is_some(),
            "import finished"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
#[path = "device_import_service_tests.rs"]
mod tests;
