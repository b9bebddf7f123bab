//! Spreadsheet import rules: column mapping, row skipping and date recovery.
//!
//! Decoding a file into cells belongs to the spreadsheet adapters; this module
//! turns the resulting [`RawTable`] into [`NewDevice`] records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use super::{DEFAULT_CYCLE_TEXT, NewDevice};

/// Number of data rows returned by an import preview.
pub const PREVIEW_ROW_LIMIT: usize = 5;

const DEFAULT_LEADING_ROWS: usize = 4;
const DEFAULT_DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];

/// Cells of a decoded spreadsheet, record by record, leading rows included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    records: Vec<Vec<String>>,
}

impl RawTable {
    /// Wrap decoded records.
    #[must_use]
    pub fn new(records: Vec<Vec<String>>) -> Self {
        Self { records }
    }

    /// Decoded records in file order.
    #[must_use]
    pub fn records(&self) -> &[Vec<String>] {
        &self.records
    }
}

/// Header text identifying each device field.
///
/// Matching is exact: drift in the export's headers is fixed by editing this
/// table, not by fuzzy matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImportColumns {
    /// Header of the equipment name column.
    pub name: String,
    /// Header of the department column.
    pub department: String,
    /// Header of the model column.
    pub model: String,
    /// Header of the serial number column.
    pub serial: String,
    /// Header of the calibration cycle column.
    pub cycle: String,
    /// Header of the last calibration date column.
    pub last_calibration: String,
    /// Header of the next-due date column.
    pub next_due: String,
    /// Header of the responsible person column.
    pub responsible: String,
}

impl Default for ImportColumns {
    fn default() -> Self {
        Self {
            name: "Tên Thiết bị".to_owned(),
            department: "Nơi đặt thiết bị".to_owned(),
            model: "Model".to_owned(),
            serial: "Seri Máy".to_owned(),
            cycle: "Thời gian thực hiện lại/ năm.".to_owned(),
            last_calibration: "Ngày cấp/ Ngày Đăng kiểm".to_owned(),
            next_due: "Thời hạn cấp lại/ Hạn đăng \nkiểm".to_owned(),
            responsible: "Người chịu trách nhiệm chính ".to_owned(),
        }
    }
}

/// Configuration describing how an export maps onto device records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImportFieldMapping {
    /// Records before the header row.
    pub leading_rows: usize,
    pub columns: ImportColumns,
    /// Cycle text stored when a row has none.
    pub default_cycle: String,
    /// Name values marking a header row repeated inside the data.
    pub header_sentinels: Vec<String>,
    /// `chrono` formats tried in order for date cells.
    pub date_formats: Vec<String>,
}

impl Default for ImportFieldMapping {
    fn default() -> Self {
        let columns = ImportColumns::default();
        Self {
            leading_rows: DEFAULT_LEADING_ROWS,
            header_sentinels: vec![columns.name.clone()],
            columns,
            default_cycle: DEFAULT_CYCLE_TEXT.to_owned(),
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|&f| f.to_owned()).collect(),
        }
    }
}

/// Layout problems that prevent reading any rows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportLayoutError {
    /// The file ends before the header row.
    #[error("spreadsheet has no header row after {leading_rows} leading rows")]
    MissingHeader { leading_rows: usize },
}

/// Header plus data rows extracted from a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedRows {
    pub headers: Vec<String>,
    pub rows: Vec<ImportRow>,
}

#[derive(Debug, Default)]
struct ColumnIndices {
    name: Option<usize>,
    department: Option<usize>,
    model: Option<usize>,
    serial: Option<usize>,
    cycle: Option<usize>,
    last_calibration: Option<usize>,
    next_due: Option<usize>,
    responsible: Option<usize>,
}

impl ColumnIndices {
    fn resolve(headers: &[String], columns: &ImportColumns) -> Self {
        let find = |wanted: &str| headers.iter().position(|h| h == wanted);
        Self {
            name: find(&columns.name),
            department: find(&columns.department),
            model: find(&columns.model),
            serial: find(&columns.serial),
            cycle: find(&columns.cycle),
            last_calibration: find(&columns.last_calibration),
            next_due: find(&columns.next_due),
            responsible: find(&columns.responsible),
        }
    }
}

fn cell(record: &[String], index: Option<usize>) -> Option<String> {
    let value = record.get(index?)?.trim();
    (!value.is_empty()).then(|| value.to_owned())
}

impl ImportFieldMapping {
    /// Parse a mapping from JSON; missing keys keep their defaults.
    ///
    /// # Errors
    /// Returns the `serde_json` error for malformed documents.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Split `table` into its header and data rows.
    ///
    /// # Errors
    /// Returns [`ImportLayoutError::MissingHeader`] when the table ends before
    /// the header row.
    pub fn extract(&self, table: &RawTable) -> Result<ExtractedRows, ImportLayoutError> {
        let mut records = table.records().iter().enumerate().skip(self.leading_rows);
        let (_, headers) = records.next().ok_or(ImportLayoutError::MissingHeader {
            leading_rows: self.leading_rows,
        })?;
        let indices = ColumnIndices::resolve(headers, &self.columns);
        let rows = records
            .map(|(index, record)| ImportRow {
                row_number: index + 1,
                name: cell(record, indices.name),
                department: cell(record, indices.department),
                model: cell(record, indices.model),
                serial: cell(record, indices.serial),
                cycle: cell(record, indices.cycle),
                last_calibration: cell(record, indices.last_calibration),
                next_due: cell(record, indices.next_due),
                responsible: cell(record, indices.responsible),
            })
            .collect();
        Ok(ExtractedRows {
            headers: headers.clone(),
            rows,
        })
    }

    fn is_sentinel(&self, name: &str) -> bool {
        name == self.columns.name.trim() || self.header_sentinels.iter().any(|s| s.trim() == name)
    }
}

/// Parse `text` with each format in order, returning the first success.
///
/// ```
/// use chrono::NaiveDate;
/// use calibration_tracker::domain::parse_import_date;
///
/// let formats = ["%Y-%m-%d".to_owned(), "%d/%m/%Y".to_owned()];
/// assert_eq!(
///     parse_import_date("27/06/2026", &formats),
///     NaiveDate::from_ymd_opt(2026, 6, 27)
/// );
/// assert_eq!(parse_import_date("soon", &formats), None);
/// ```
#[must_use]
pub fn parse_import_date(text: &str, formats: &[String]) -> Option<NaiveDate> {
    let text = text.trim();
    formats
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

/// Why a data row produced no device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// The name cell is empty.
    BlankName,
    /// The name cell repeats the header text.
    RepeatedHeader,
}

/// One data row with mapped cells; absent cells are `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRow {
    /// 1-based record number in the file.
    pub row_number: usize,
    pub name: Option<String>,
    pub department: Option<String>,
    pub model: Option<String>,
    pub serial: Option<String>,
    pub cycle: Option<String>,
    pub last_calibration: Option<String>,
    pub next_due: Option<String>,
    pub responsible: Option<String>,
}

impl ImportRow {
    /// Turn the row into a device record.
    ///
    /// Unparsable dates become `today`; absent dates stay unset.
    ///
    /// # Errors
    /// Returns the [`SkipReason`] for rows that must not be imported.
    pub fn into_new_device(
        self,
        mapping: &ImportFieldMapping,
        today: NaiveDate,
    ) -> Result<NewDevice, SkipReason> {
        let name = self.name.ok_or(SkipReason::BlankName)?;
        if mapping.is_sentinel(&name) {
            return Err(SkipReason::RepeatedHeader);
        }
        let row_number = self.row_number;
        let date = |raw: Option<String>, field: &'static str| {
            raw.map(|text| {
                parse_import_date(&text, &mapping.date_formats).unwrap_or_else(|| {
                    debug!(row_number, field, value = %text, "unparsable date replaced with today");
                    today
                })
            })
        };
        Ok(NewDevice {
            last_calibration: date(self.last_calibration, "last_calibration"),
            next_due: date(self.next_due, "next_due"),
            name,
            department: self.department.unwrap_or_default(),
            model: self.model.unwrap_or_default(),
            serial: self.serial.unwrap_or_default(),
            cycle: self.cycle.unwrap_or_else(|| mapping.default_cycle.clone()),
            responsible: self.responsible.unwrap_or_default(),
        })
    }
}

/// A data row as it would be imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRow {
    /// 1-based record number in the file.
    pub row_number: usize,
    /// Device that would be created; absent for skipped rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device: Option<NewDevice>,
    /// Why the row would be skipped.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<SkipReason>,
}

/// Header and first rows of an upload, shown before committing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportPreview {
    /// Cells of the header record.
    pub headers: Vec<String>,
    /// Data rows after the header, skipped ones included.
    pub total_rows: usize,
    /// The first data rows as they would import.
    pub rows: Vec<PreviewRow>,
}

/// The row that stopped an import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportFailure {
    /// 1-based record number of the failing row.
    pub row_number: usize,
    /// Store error that stopped the import.
    pub message: String,
}

/// Result of committing an upload.
///
/// Devices created before a failure stay created.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportOutcome {
    /// Devices created.
    pub created: usize,
    /// Rows skipped as blank or repeated headers.
    pub skipped: usize,
    /// The store failure that stopped the import, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<ImportFailure>,
}

#[cfg(test)]
#[path = "import_tests.rs"]
mod tests;
