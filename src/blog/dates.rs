//! Publication date parsing.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::warn;

/// Naive date-time layouts tried after RFC 2822 and RFC 3339.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Date-only layouts, read as midnight UTC.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%B %d, %Y", "%b %d, %Y", "%m/%d/%Y"];

/// Parse a date string in any of the layouts the blog platform emits.
///
/// Returns `None` for blank or unrecognized input.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
  let raw = raw.trim();
  if raw.is_empty() {
    return None;
  }

  if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
    return Some(parsed.with_timezone(&Utc));
  }
  if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
    return Some(parsed.with_timezone(&Utc));
  }

  DATETIME_FORMATS
    .iter()
    .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
    .or_else(|| {
      DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    })
    .map(|naive| naive.and_utc())
}

/// Parse a date, falling back to the current time.
///
/// A missing or malformed date is not an error; the post is still migrated
/// and the anomaly is logged against `context`.
pub fn parse_date_or_now(raw: Option<&str>, context: &str) -> DateTime<Utc> {
  match raw.and_then(parse_date) {
    Some(date) => date,
    None => {
      warn!("Unparseable publish date {raw:?} for {context}, using the current time");
      Utc::now()
    }
  }
}
