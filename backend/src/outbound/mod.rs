//! Outbound adapters implementing the driven domain ports.
//!
//! - **persistence**: PostgreSQL-backed device repository using Diesel ORM
//! - **memory**: in-process device repository for tests and demos
//! - **spreadsheet**: CSV and workbook decoding for bulk import
//!
//! Adapters translate between domain types and infrastructure representations
//! and contain no calibration rules.

pub mod memory;
pub mod persistence;
pub mod spreadsheet;
