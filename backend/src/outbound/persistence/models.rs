//! Internal Diesel row structs.
//!
//! These never leave the persistence layer; conversions to domain types live
//! beside them.

use chrono::NaiveDate;
use diesel::prelude::*;

use crate::domain::{Device, DeviceId, HistoryEntry, NewDevice};

use super::schema::{device_history, devices};

/// Row read from `devices`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = devices)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DeviceRow {
    pub id: i64,
    pub name: String,
    pub department: String,
    pub model: String,
    pub serial: String,
    pub cycle: String,
    pub last_calibration: Option<NaiveDate>,
    pub next_due: Option<NaiveDate>,
    pub responsible: String,
    pub status: String,
}

impl From<DeviceRow> for Device {
    fn from(row: DeviceRow) -> Self {
        Self {
            id: DeviceId::new(row.id),
            name: row.name,
            department: row.department,
            model: row.model,
            serial: row.serial,
            cycle: row.cycle,
            last_calibration: row.last_calibration,
            next_due: row.next_due,
            responsible: row.responsible,
            status: row.status,
        }
    }
}

/// Insertable device; `status` takes the column default.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = devices)]
pub(crate) struct NewDeviceRow<'a> {
    pub name: &'a str,
    pub department: &'a str,
    pub model: &'a str,
    pub serial: &'a str,
    pub cycle: &'a str,
    pub last_calibration: Option<NaiveDate>,
    pub next_due: Option<NaiveDate>,
    pub responsible: &'a str,
}

impl<'a> From<&'a NewDevice> for NewDeviceRow<'a> {
    fn from(device: &'a NewDevice) -> Self {
        Self {
            name: &device.name,
            department: &device.department,
            model: &device.model,
            serial: &device.serial,
            cycle: &device.cycle,
            last_calibration: device.last_calibration,
            next_due: device.next_due,
            responsible: &device.responsible,
        }
    }
}

/// Row read from `device_history`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = device_history)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct HistoryRow {
    pub id: i64,
    pub device_id: i64,
    pub performed_on: NaiveDate,
    pub action: String,
    pub note: String,
}

impl From<HistoryRow> for HistoryEntry {
    fn from(row: HistoryRow) -> Self {
        Self {
            id: row.id,
            device_id: DeviceId::new(row.device_id),
            performed_on: row.performed_on,
            action: row.action,
            note: row.note,
        }
    }
}

/// Insertable history entry.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = device_history)]
pub(crate) struct NewHistoryRow<'a> {
    pub device_id: i64,
    pub performed_on: NaiveDate,
    pub action: &'a str,
    pub note: &'a str,
}
