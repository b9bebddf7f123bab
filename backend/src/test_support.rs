//! Shared helpers for unit tests (in `src/`) and integration tests (in
//! `tests/`). Compiled for tests and behind the `test-support` feature.

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{DEFAULT_CYCLE_TEXT, NewDevice};

/// Clock pinned to noon on a fixed local date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    local: DateTime<Local>,
}

impl FixedClock {
    /// A clock whose local date is always `date`.
    #[must_use]
    pub fn on(date: NaiveDate) -> Self {
        let noon = date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or_default());
        let local = Local
            .from_local_datetime(&noon)
            .earliest()
            .unwrap_or_else(|| Utc.from_utc_datetime(&noon).with_timezone(&Local));
        Self { local }
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.local
    }

    fn utc(&self) -> DateTime<Utc> {
        self.local.with_timezone(&Utc)
    }
}

/// Minimal device record for tests.
#[must_use]
pub fn new_device(name: &str, department: &str) -> NewDevice {
    NewDevice {
        name: name.to_owned(),
        department: department.to_owned(),
        model: String::new(),
        serial: String::new(),
        cycle: DEFAULT_CYCLE_TEXT.to_owned(),
        last_calibration: None,
        next_due: None,
        responsible: String::new(),
    }
}
