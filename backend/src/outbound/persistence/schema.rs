//! Diesel table definitions for the PostgreSQL schema.
//!
//! Must match `migrations/` exactly; regenerate with `diesel print-schema`
//! after schema changes.

diesel::table! {
    /// Registered equipment.
    devices (id) {
        id -> Int8,
        name -> Text,
        department -> Text,
        model -> Text,
        serial -> Text,
        cycle -> Text,
        last_calibration -> Nullable<Date>,
        next_due -> Nullable<Date>,
        responsible -> Text,
        /// Defaults to `active` on insert.
        status -> Text,
    }
}

diesel::table! {
    /// Completion events, append-only.
    device_history (id) {
        id -> Int8,
        /// References `devices.id` without a foreign key.
        device_id -> Int8,
        performed_on -> Date,
        action -> Text,
        note -> Text,
    }
}

diesel::allow_tables_to_appear_in_same_query!(devices, device_history);
