use chrono::{DateTime, FixedOffset, Offset, Utc};

/// Renders an instant in the given zone the way `en-US` locale strings read,
/// e.g. `10/16/2026, 3:04:05 PM`
pub fn localized_timestamp(at: DateTime<Utc>, utc_offset_hours: i32) -> String {
    let offset = FixedOffset::east_opt(utc_offset_hours * 3600).unwrap_or(Utc.fix());
    at.with_timezone(&offset)
        .format("%-m/%-d/%Y, %-I:%M:%S %p")
        .to_string()
}
