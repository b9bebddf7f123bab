//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports ([`DeviceRepository`], [`SpreadsheetReader`]) are implemented
//! by outbound adapters. Driving ports ([`DeviceCommand`], [`DeviceQuery`],
//! [`DeadlineQuery`], [`DeviceImportCommand`]) are implemented by the domain
//! services and consumed by inbound adapters.

mod deadline_query;
mod device_command;
mod device_import_command;
mod device_query;
mod device_repository;
mod spreadsheet_reader;

#[cfg(test)]
pub use deadline_query::MockDeadlineQuery;
pub use deadline_query::DeadlineQuery;
#[cfg(test)]
pub use device_command::MockDeviceCommand;
pub use device_command::{CompletionRequest, DeviceCommand};
#[cfg(test)]
pub use device_import_command::MockDeviceImportCommand;
pub use device_import_command::DeviceImportCommand;
#[cfg(test)]
pub use device_query::MockDeviceQuery;
pub use device_query::DeviceQuery;
#[cfg(test)]
pub use device_repository::MockDeviceRepository;
pub use device_repository::{DeviceRepository, DeviceRepositoryError};
#[cfg(test)]
pub use spreadsheet_reader::MockSpreadsheetReader;
pub use spreadsheet_reader::{SpreadsheetFormat, SpreadsheetReadError, SpreadsheetReader, SpreadsheetUpload};
