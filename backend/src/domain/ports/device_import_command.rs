//! Driving port for bulk import from spreadsheet exports.

use async_trait::async_trait;

use super::SpreadsheetUpload;
use crate::domain::{Error, ImportOutcome, ImportPreview};

/// Import use-cases: look first, then commit.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeviceImportCommand: Send + Sync {
    /// Show how the first rows would import, without writing.
    async fn preview(&self, upload: &SpreadsheetUpload) -> Result<ImportPreview, Error>;

    /// Create one device per accepted row.
    async fn import(&self, upload: &SpreadsheetUpload) -> Result<ImportOutcome, Error>;
}
