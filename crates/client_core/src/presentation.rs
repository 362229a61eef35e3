//! Display formatting for bill dates and statuses, and the list ordering.
//!
//! Everything here is pure and total: bad input degrades to a fallback value.

use std::cmp::Ordering;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use shared::domain::BillStatus;

/// French short month names, cut to three characters like the rest of the app.
const MONTHS: [&str; 12] = [
    "Jan", "Fév", "Mar", "Avr", "Mai", "Jui", "Jui", "Aoû", "Sep", "Oct", "Nov", "Déc",
];

pub const UNKNOWN_STATUS_LABEL: &str = "Statut inconnu";

/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps and naive `YYYY-MM-DDTHH:MM:SS`.
pub fn parse_bill_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.date_naive());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|timestamp| timestamp.date())
}

/// `2004-04-04` becomes `4 Avr. 04`. Unparseable input is returned unchanged.
pub fn format_display_date(raw: &str) -> String {
    match parse_bill_date(raw) {
        Some(date) => display_date(date),
        None => raw.to_string(),
    }
}

fn display_date(date: NaiveDate) -> String {
    let month = MONTHS[date.month0() as usize];
    format!(
        "{} {month}. {:02}",
        date.day(),
        date.year().rem_euclid(100)
    )
}

pub fn format_status_label(status: BillStatus) -> &'static str {
    match status {
        BillStatus::Pending => "En attente",
        BillStatus::Accepted => "Accepté",
        BillStatus::Refused => "Refusé",
        BillStatus::Unknown => UNKNOWN_STATUS_LABEL,
    }
}

/// Most recent first. Unparseable dates rank as the oldest and keep their
/// relative order among themselves.
pub fn compare_by_date_descending(a: &str, b: &str) -> Ordering {
    match (parse_bill_date(a), parse_bill_date(b)) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
#[path = "tests/presentation_tests.rs"]
mod tests;
