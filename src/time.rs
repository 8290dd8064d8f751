use chrono::{DateTime, NaiveDateTime};

const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";
const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Parse the execution timestamp a task carries. The wire is loose about the
/// shape: datetime-local inputs produce `2026-08-07T14:30`, server-side
/// records carry full RFC 3339 instants. Offset-bearing values are
/// normalized to UTC before the offset is dropped.
pub fn parse_execution(value: &str) -> Option<NaiveDateTime> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.naive_utc());
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S") {
        return Some(parsed);
    }
    NaiveDateTime::parse_from_str(value, INPUT_FORMAT).ok()
}

/// Re-render a stored execution timestamp for a datetime-local form field
/// (`YYYY-MM-DDTHH:MM`). Returns `None` when the stored value is not a
/// recognizable timestamp.
pub fn format_for_input(value: &str) -> Option<String> {
    parse_execution(value).map(|dt| dt.format(INPUT_FORMAT).to_string())
}

/// Render a stored execution timestamp for read-only display. Unparseable
/// values come back verbatim so a bad record still shows something.
pub fn format_for_display(value: &str) -> String {
    match parse_execution(value) {
        Some(dt) => dt.format(DISPLAY_FORMAT).to_string(),
        None => value.to_string(),
    }
}
