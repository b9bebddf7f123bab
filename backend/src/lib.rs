//! Calibration tracking for medical equipment.
//!
//! The crate is laid out hexagonally: [`domain`] holds the device registry,
//! the calibration scheduler and the import rules; [`outbound`] adapts them to
//! PostgreSQL, memory and spreadsheet files; [`inbound`] exposes them over
//! HTTP.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
