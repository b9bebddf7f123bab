//! Spreadsheet decoding adapters for bulk import.
//!
//! [`SpreadsheetFileReader`] picks a decoder from the upload's extension:
//! CSV through the `csv` crate, workbooks through `calamine`.

mod csv_table;
mod workbook_table;

use tracing::debug;

use crate::domain::RawTable;
use crate::domain::ports::{
    SpreadsheetFormat, SpreadsheetReadError, SpreadsheetReader, SpreadsheetUpload,
};

/// Reader dispatching on file extension.
#[derive(Debug, Default, Clone, Copy)]
pub struct SpreadsheetFileReader;

impl SpreadsheetReader for SpreadsheetFileReader {
    fn read(&self, upload: &SpreadsheetUpload) -> Result<RawTable, SpreadsheetReadError> {
        let format = SpreadsheetFormat::from_file_name(&upload.file_name)
            .ok_or_else(|| SpreadsheetReadError::unsupported_format(upload.file_name.as_str()))?;
        let table = match format {
            SpreadsheetFormat::Csv => csv_table::decode(&upload.bytes)?,
            SpreadsheetFormat::Workbook => workbook_table::decode(&upload.bytes)?,
        };
        debug!(
            file_name = %upload.file_name,
            ?format,
            records = table.records().len(),
            "spreadsheet decoded"
        );
        Ok(table)
    }
}
