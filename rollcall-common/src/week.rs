//! ISO week identifiers for invocation accounting
//!
//! Endpoint invocations are counted per ISO week (Monday start) so that a
//! runaway upstream exporter can be noticed before it burns a month of quota.

use chrono::{DateTime, Datelike, Utc};

/// Generate the week id (`YYYY-WW`, ISO 8601 week numbering) for a timestamp.
pub fn week_id(date: DateTime<Utc>) -> String {
    let iso = date.iso_week();
    format!("{:04}-{:02}", iso.year(), iso.week())
}

/// Week id for the current wall-clock week.
pub fn current_week_id() -> String {
    week_id(Utc::now())
}
