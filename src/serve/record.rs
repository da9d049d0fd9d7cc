use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::{
    catalog::{labels::Language, style::StyleId},
    foundation::{
        color::Rgb8,
        error::{CountdownError, CountdownResult},
    },
    render::pipeline::TimerSpec,
};

/// One persisted timer row, as stored by the persistence collaborator.
///
/// Only `end_date`, `timezone`, `style`, `color` and `language` feed rendering; the rest is
/// carried so records survive a load/save round trip.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TimerRecord {
    /// Record identifier.
    pub id: String,
    /// Owning user, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    /// Target instant, ISO-8601.
    pub end_date: String,
    /// IANA zone identifier; `UTC` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
    /// Style name.
    #[serde(default = "default_style")]
    pub style: String,
    /// Hex RGB color.
    pub color: String,
    /// Language code; `en` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Creation instant, ISO-8601.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// View counter.
    #[serde(default)]
    pub views: u64,
    /// Optional view cap.
    #[serde(default)]
    pub max_views: Option<u64>,
    /// Whether the timer is enabled.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_style() -> String {
    StyleId::default().name().to_string()
}

fn default_active() -> bool {
    true
}

impl TimerRecord {
    /// Minimal record with the given id, end date and color.
    pub fn new(id: impl Into<String>, end_date: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            user_id: None,
            end_date: end_date.into(),
            timezone: None,
            style: default_style(),
            color: color.into(),
            language: None,
            created_at: None,
            views: 0,
            max_views: None,
            active: true,
        }
    }

    /// Resolve the rendering inputs.
    ///
    /// Unknown style, language and timezone fall back to their defaults; a malformed date or
    /// color is a validation error.
    pub fn to_spec(&self) -> CountdownResult<TimerSpec> {
        let end_instant = parse_instant(&self.end_date)?;
        let color = Rgb8::parse_hex(&self.color)?;
        let spec = TimerSpec::new(end_instant, color)
            .with_style(StyleId::resolve(&self.style))
            .with_language(Language::resolve(self.language.as_deref().unwrap_or("")))
            .with_timezone(self.timezone.as_deref().unwrap_or("UTC"));
        Ok(spec)
    }
}

/// Parse an RFC 3339 instant, or a naive date/time taken as UTC.
pub fn parse_instant(s: &str) -> CountdownResult<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc());
        }
    }
    if let Some(midnight) = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc());
    }
    Err(CountdownError::validation(format!(
        "end_date '{s}' is not an ISO-8601 instant"
    )))
}

#[cfg(test)]
#[path = "../../tests/unit/serve/record.rs"]
mod tests;
