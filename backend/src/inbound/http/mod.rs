//! HTTP inbound adapter exposing the REST endpoints under `/api/v1`.

pub mod deadlines;
pub mod devices;
pub mod error;
pub mod health;
pub mod imports;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;
