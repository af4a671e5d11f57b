//! Stable presentation labels for report keys
//!
//! Maps internal keys (record-type codes, numeric weekday/month indices) to
//! the labels reports emit. Localization of these labels belongs to the host
//! application; the tables here are the stable wire values.

use crate::types::RecordType;

/// Weekday labels, Monday-first to match ISO-8601 week numbering.
pub const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

/// Month labels in chronological order.
pub const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Label for a Monday-based weekday index (0 = Monday).
pub fn weekday_label(index: u32) -> &'static str {
    WEEKDAYS.get(index as usize).copied().unwrap_or("Unknown")
}

/// Label for a 1-based month number.
pub fn month_label(month: u32) -> &'static str {
    if (1..=12).contains(&month) {
        MONTHS[(month - 1) as usize]
    } else {
        "Unknown"
    }
}

/// Label for a record type.
pub fn record_type_label(record_type: RecordType) -> &'static str {
    record_type.display_name()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_labels() {
        assert_eq!(weekday_label(0), "Mon");
        assert_eq!(weekday_label(6), "Sun");
        assert_eq!(weekday_label(7), "Unknown");
    }

    #[test]
    fn test_month_labels() {
        assert_eq!(month_label(1), "Jan");
        assert_eq!(month_label(12), "Dec");
        assert_eq!(month_label(0), "Unknown");
        assert_eq!(month_label(13), "Unknown");
    }

    #[test]
    fn test_record_type_labels() {
        assert_eq!(record_type_label(RecordType::Individual), "Individual");
        assert_eq!(record_type_label(RecordType::Other), "Other");
    }
}
