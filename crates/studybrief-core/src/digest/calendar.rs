//! Which calendar day a request is for

use crate::error::CoreError;
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

/// Validate an explicit `YYYY-MM-DD` date, or derive today's date in `timezone`.
///
/// The timezone must name a known IANA zone even when a date is given.
pub fn resolve_date(
    date: Option<&str>,
    timezone: &str,
    now: DateTime<Utc>,
) -> Result<String, CoreError> {
    let explicit = date
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(|date| {
            NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| CoreError::InvalidDate {
                value: date.to_string(),
            })
        })
        .transpose()?;

    let tz: Tz = timezone
        .trim()
        .parse()
        .map_err(|_| CoreError::InvalidTimezone {
            value: timezone.to_string(),
        })?;

    let day = explicit.unwrap_or_else(|| now.with_timezone(&tz).date_naive());
    Ok(day.format("%Y-%m-%d").to_string())
}
