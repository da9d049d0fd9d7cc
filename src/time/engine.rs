use chrono::{DateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

const MS_PER_SECOND: u64 = 1_000;
const MS_PER_MINUTE: u64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: u64 = 24 * MS_PER_HOUR;

/// Whole time units remaining until the end instant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct TimeBreakdown {
    /// Whole days.
    pub days: u64,
    /// Hours within the day, `0..24`.
    pub hours: u8,
    /// Minutes within the hour, `0..60`.
    pub minutes: u8,
    /// Seconds within the minute, `0..60`.
    pub seconds: u8,
}

impl TimeBreakdown {
    /// Split a non-negative millisecond distance into units.
    pub fn from_distance_ms(distance_ms: u64) -> Self {
        let d = distance_ms;
        Self {
            days: d / MS_PER_DAY,
            hours: ((d % MS_PER_DAY) / MS_PER_HOUR) as u8,
            minutes: ((d % MS_PER_HOUR) / MS_PER_MINUTE) as u8,
            seconds: ((d % MS_PER_MINUTE) / MS_PER_SECOND) as u8,
        }
    }

    /// The four unit values in display order: days, hours, minutes, seconds.
    pub fn units(self) -> [u64; 4] {
        [
            self.days,
            u64::from(self.hours),
            u64::from(self.minutes),
            u64::from(self.seconds),
        ]
    }
}

/// Result of one Time Engine evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Countdown {
    /// The end instant has not passed; `distance >= 0`.
    Remaining(TimeBreakdown),
    /// The end instant has passed; `distance < 0`.
    Expired,
}

impl Countdown {
    /// Return `true` for [`Countdown::Expired`].
    pub fn is_expired(self) -> bool {
        matches!(self, Countdown::Expired)
    }

    /// The breakdown, if not expired.
    pub fn breakdown(self) -> Option<TimeBreakdown> {
        match self {
            Countdown::Remaining(b) => Some(b),
            Countdown::Expired => None,
        }
    }
}

/// Resolve an IANA zone identifier, falling back to UTC for anything unrecognized.
pub fn resolve_timezone(name: &str) -> Tz {
    let name = name.trim();
    if name.is_empty() {
        return Tz::UTC;
    }
    match name.parse::<Tz>() {
        Ok(tz) => tz,
        Err(_) => {
            tracing::debug!(timezone = name, "unrecognized timezone, using UTC");
            Tz::UTC
        }
    }
}

/// UTC offset of `tz` in effect at `at`, in seconds east of UTC (DST included).
pub fn utc_offset_secs(tz: Tz, at: DateTime<Utc>) -> i32 {
    tz.offset_from_utc_datetime(&at.naive_utc())
        .fix()
        .local_minus_utc()
}

/// Signed milliseconds from the zone-adjusted `now` to `end`.
///
/// `now` is shifted by the zone's offset exactly once: `end - (now + offset(now))`.
pub fn distance_ms(end: DateTime<Utc>, now: DateTime<Utc>, tz: Tz) -> i64 {
    let offset_ms = i64::from(utc_offset_secs(tz, now)) * 1_000;
    let adjusted_now = now.timestamp_millis().saturating_add(offset_ms);
    end.timestamp_millis().saturating_sub(adjusted_now)
}

/// Compute the countdown for `end` as observed at `now` in `timezone`.
///
/// Pure: the same arguments always yield the same result. `distance == 0` is a zero breakdown;
/// any negative distance is [`Countdown::Expired`].
pub fn compute(end: DateTime<Utc>, now: DateTime<Utc>, timezone: &str) -> Countdown {
    compute_in(end, now, resolve_timezone(timezone))
}

/// [`compute`] with an already-resolved zone.
pub fn compute_in(end: DateTime<Utc>, now: DateTime<Utc>, tz: Tz) -> Countdown {
    let d = distance_ms(end, now, tz);
    if d < 0 {
        Countdown::Expired
    } else {
        Countdown::Remaining(TimeBreakdown::from_distance_ms(d as u64))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/time/engine.rs"]
mod tests;
