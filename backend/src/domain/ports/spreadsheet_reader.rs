//! Driven port decoding uploaded spreadsheets into raw cells.

use crate::domain::RawTable;

/// Errors raised while decoding an upload.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SpreadsheetReadError {
    /// The file name does not name a supported format.
    #[error("unsupported spreadsheet format: {file_name}")]
    UnsupportedFormat { file_name: String },
    /// The file could not be decoded.
    #[error("spreadsheet could not be read: {message}")]
    Malformed { message: String },
}

impl SpreadsheetReadError {
    pub fn unsupported_format(file_name: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            file_name: file_name.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }
}

/// Formats accepted for import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpreadsheetFormat {
    /// Comma-separated text.
    Csv,
    /// Excel or OpenDocument workbook; the first worksheet is read.
    Workbook,
}

impl SpreadsheetFormat {
    /// Detect the format from a file name's extension.
    ///
    /// ```
    /// use calibration_tracker::domain::ports::SpreadsheetFormat;
    ///
    /// assert_eq!(SpreadsheetFormat::from_file_name("thiet_bi.CSV"), Some(SpreadsheetFormat::Csv));
    /// assert_eq!(SpreadsheetFormat::from_file_name("notes.txt"), None);
    /// ```
    #[must_use]
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, extension) = file_name.rsplit_once('.')?;
        match extension.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(Self::Workbook),
            _ => None,
        }
    }
}

/// An uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpreadsheetUpload {
    /// Name the file arrived under; its extension selects the decoder.
    pub file_name: String,
    /// Raw file contents.
    pub bytes: Vec<u8>,
}

impl SpreadsheetUpload {
    /// Wrap uploaded bytes with the name they arrived under.
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

/// Port turning uploads into [`RawTable`]s.
#[cfg_attr(test, mockall::automock)]
pub trait SpreadsheetReader: Send + Sync {
    /// Decode every record of `upload`, leading rows included.
    fn read(&self, upload: &SpreadsheetUpload) -> Result<RawTable, SpreadsheetReadError>;
}
