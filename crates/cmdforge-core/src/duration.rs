//! Human duration strings (`"10 seconds"`, `"5 minutes"`, `"1 hour"`).

use std::time::Duration;

/// Parses `"<integer> <unit>"` into a [`Duration`].
///
/// The unit is matched case-insensitively by prefix, so `second`, `seconds`
/// and `secs` all work. Anything that does not fit the shape (wrong token
/// count, non-integer amount, unknown unit, non-positive amount) yields
/// [`Duration::ZERO`], which callers treat as "no duration".
pub fn parse_duration(text: &str) -> Duration {
    let mut parts = text.split_whitespace();
    let (Some(amount), Some(unit), None) = (parts.next(), parts.next(), parts.next()) else {
        return Duration::ZERO;
    };
    let Ok(amount) = amount.parse::<i64>() else {
        return Duration::ZERO;
    };
    if amount <= 0 {
        return Duration::ZERO;
    }
    let amount = amount.unsigned_abs();

    let unit = unit.to_ascii_lowercase();
    let seconds_per_unit = if unit.starts_with("sec") {
        1
    } else if unit.starts_with("min") {
        60
    } else if unit.starts_with("hour") {
        3600
    } else {
        return Duration::ZERO;
    };

    Duration::from_secs(amount.saturating_mul(seconds_per_unit))
}
