//! Dashboard aggregates and the sorted deadline list.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Device, Urgency, classify, days_remaining};

/// Filter value meaning "every department".
pub const ALL_DEPARTMENTS: &str = "all";

/// Department narrowing applied to listings and the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DepartmentFilter {
    /// No narrowing.
    #[default]
    All,
    /// Only devices whose department matches exactly.
    Only(String),
}

impl DepartmentFilter {
    /// Interpret an optional query value; blank and `"all"` select everything.
    #[must_use]
    pub fn from_query(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") => Self::All,
            Some(v) if v.eq_ignore_ascii_case(ALL_DEPARTMENTS) => Self::All,
            Some(v) => Self::Only(v.to_owned()),
        }
    }

    /// Whether `device` passes the filter.
    #[must_use]
    pub fn matches(&self, device: &Device) -> bool {
        match self {
            Self::All => true,
            Self::Only(department) => device.department == *department,
        }
    }
}

/// Number of devices in one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentCount {
    /// Department name as stored.
    pub department: String,
    /// Devices placed there.
    pub count: usize,
}

/// One slice of the status chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusBucket {
    /// Bucket being counted.
    pub urgency: Urgency,
    /// Devices in the bucket.
    pub count: usize,
    /// Chart colour for the bucket.
    pub colour: String,
}

/// Aggregate counts shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Devices matching the filter.
    pub total: usize,
    /// Devices past their next-due date.
    pub overdue: usize,
    /// Devices due within the window.
    pub due_soon: usize,
    /// Remaining devices, undated ones included.
    pub safe: usize,
    /// Device counts per department, largest first.
    pub departments: Vec<DepartmentCount>,
    /// Urgency counts in chart order.
    pub statuses: Vec<StatusBucket>,
}

/// A device on the deadline tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeadlineEntry {
    /// The tracked device.
    pub device: Device,
    /// Days until the next-due date; negative when overdue, `None` when undated.
    pub days_remaining: Option<i64>,
    /// Urgency bucket as of today.
    pub urgency: Urgency,
}

/// Summarize `devices` as of `today`.
///
/// `safe` is whatever is neither overdue nor due soon, so devices without a
/// next-due date count as safe.
#[must_use]
pub fn summarize(devices: &[Device], today: NaiveDate) -> DashboardSummary {
    let total = devices.len();
    let mut overdue = 0;
    let mut due_soon = 0;
    for next_due in devices.iter().filter_map(|d| d.next_due) {
        match classify(next_due, today) {
            Urgency::Overdue => overdue += 1,
            Urgency::DueSoon => due_soon += 1,
            Urgency::Safe => {}
        }
    }
    let safe = total.saturating_sub(overdue + due_soon);

    let statuses = Urgency::ALL
        .into_iter()
        .zip([overdue, due_soon, safe])
        .map(|(urgency, count)| StatusBucket {
            urgency,
            count,
            colour: urgency.chart_colour().to_owned(),
        })
        .collect();

    DashboardSummary {
        total,
        overdue,
        due_soon,
        safe,
        departments: department_distribution(devices),
        statuses,
    }
}

fn department_distribution(devices: &[Device]) -> Vec<DepartmentCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for device in devices {
        *counts.entry(device.department.as_str()).or_default() += 1;
    }
    let mut distribution: Vec<_> = counts
        .into_iter()
        .map(|(department, count)| DepartmentCount {
            department: department.to_owned(),
            count,
        })
        .collect();
    distribution.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.department.cmp(&b.department))
    });
    distribution
}

/// Deadline entries for `devices`, most urgent first.
///
/// Devices without a next-due date trail the list. The sort is stable, so
/// ties keep the registry order.
#[must_use]
pub fn deadline_entries(devices: Vec<Device>, today: NaiveDate) -> Vec<DeadlineEntry> {
    let mut entries: Vec<_> = devices
        .into_iter()
        .map(|device| {
            let days = device.next_due.map(|due| days_remaining(due, today));
            let urgency = device
                .next_due
                .map_or(Urgency::Safe, |due| classify(due, today));
            DeadlineEntry {
                device,
                days_remaining: days,
                urgency,
            }
        })
        .collect();
    entries.sort_by_key(|entry| (entry.days_remaining.is_none(), entry.days_remaining));
    entries
}
