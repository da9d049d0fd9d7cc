use chrono::{DateTime, Utc};

use crate::time::engine::resolve_timezone;

/// A selectable timezone with its display label.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct TimezoneOption {
    /// IANA identifier.
    pub value: String,
    /// Human-readable label.
    pub label: String,
}

const COMMON_TIMEZONES: &[(&str, &str)] = &[
    ("UTC", "UTC (GMT+0)"),
    ("America/New_York", "New York (GMT-4)"),
    ("America/Los_Angeles", "Los Angeles (GMT-7)"),
    ("America/Chicago", "Chicago (GMT-5)"),
    ("America/Toronto", "Toronto (GMT-4)"),
    ("Europe/London", "London (GMT+1)"),
    ("Europe/Paris", "Paris (GMT+2)"),
    ("Europe/Berlin", "Berlin (GMT+2)"),
    ("Europe/Moscow", "Moscow (GMT+3)"),
    ("Asia/Dubai", "Dubai (GMT+4)"),
    ("Asia/Singapore", "Singapore (GMT+8)"),
    ("Asia/Tokyo", "Tokyo (GMT+9)"),
    ("Asia/Shanghai", "Shanghai (GMT+8)"),
    ("Australia/Sydney", "Sydney (GMT+10)"),
    ("Pacific/Auckland", "Auckland (GMT+12)"),
];

/// The curated zones offered to operators, with static labels.
pub fn common_timezones() -> Vec<TimezoneOption> {
    COMMON_TIMEZONES
        .iter()
        .map(|(value, label)| TimezoneOption {
            value: (*value).to_string(),
            label: (*label).to_string(),
        })
        .collect()
}

/// [`common_timezones`] with the wall-clock time at `now` appended, e.g.
/// `"Tokyo (GMT+9) (09:00 PM)"`.
pub fn timezone_options(now: DateTime<Utc>) -> Vec<TimezoneOption> {
    COMMON_TIMEZONES
        .iter()
        .map(|(value, label)| {
            let local = now.with_timezone(&resolve_timezone(value));
            TimezoneOption {
                value: (*value).to_string(),
                label: format!("{label} ({})", local.format("%I:%M %p")),
            }
        })
        .collect()
}
