//! Excel and OpenDocument decoding through `calamine`.
//!
//! Only the first worksheet is read. Date cells become ISO dates so the
//! import date strategies see the same text a CSV export would carry.
//! Records are indexed by absolute sheet row, so blank rows above the used
//! range are kept as empty records.

use std::io::Cursor;

use calamine::{Data, DataType, Range, Reader, open_workbook_auto_from_rs};

use crate::domain::RawTable;
use crate::domain::ports::SpreadsheetReadError;

pub(super) fn decode(bytes: &[u8]) -> Result<RawTable, SpreadsheetReadError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|err| SpreadsheetReadError::malformed(format!("failed to open workbook: {err}")))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SpreadsheetReadError::malformed("workbook has no worksheets"))?
        .map_err(|err| SpreadsheetReadError::malformed(format!("failed to read worksheet: {err}")))?;

    Ok(RawTable::new(sheet_records(&range)))
}

fn sheet_records(range: &Range<Data>) -> Vec<Vec<String>> {
    let first_row = range.start().map_or(0, |(row, _)| row);
    let blank_rows = (0..first_row).map(|_| Vec::new());
    let used_rows = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect());
    blank_rows.chain(used_rows).collect()
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DurationIso(s) => s.clone(),
        Data::DateTimeIso(s) => s.split('T').next().unwrap_or_default().to_owned(),
        Data::DateTime(_) => cell
            .as_date()
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 => format!("{f:.0}"),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::Error(_) => String::new(),
    }
}
