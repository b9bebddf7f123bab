//! CSV decoding.

use csv::ReaderBuilder;

use crate::domain::RawTable;
use crate::domain::ports::SpreadsheetReadError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decode every record; rows may differ in width.
pub(super) fn decode(bytes: &[u8]) -> Result<RawTable, SpreadsheetReadError> {
    let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(body);
    let records = reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_owned).collect())
                .map_err(|err| SpreadsheetReadError::malformed(err.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(RawTable::new(records))
}
