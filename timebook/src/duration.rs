//! Free-text duration parsing.
//!
//! Normalizes the notations people type into a time field ("30", "30m", "1.5h",
//! "2:30", "0.5") into canonical minutes, rounded to the nearest quarter hour.

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Granularity of canonical minutes.
pub const QUARTER_MINUTES: u32 = 15;

/// Smallest duration that can be booked.
pub const MIN_BOOKING_MINUTES: u32 = 15;

// Tried in order, first structural match wins. ASCII digits only, `\d` would
// also accept other Unicode digits.
static COLON_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+):([0-9]{1,2})$").unwrap());
static HOURS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+(?:\.[0-9]+)?|\.[0-9]+)h$").unwrap());
static MINUTES_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)m$").unwrap());
static INTEGER_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([0-9]+)$").unwrap());
static DECIMAL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]*\.[0-9]+)$").unwrap());

/// Caller-side validation failures for a duration that is about to be booked.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DurationError {
    #[error("not a recognizable duration")]
    Unparsable,
    #[error("{0} minutes is below the 15 minute minimum")]
    BelowMinimum(u32),
}

/// Parse free text into canonical minutes.
///
/// Returns `None` when the text is not a recognizable duration. Small values are
/// reported as parsed (`"7"` rounds to `Some(0)`); rejecting them is up to the
/// caller, see [`validate_booking_minutes`].
///
/// # Examples
///
/// ```
/// use timebook::duration::parse_duration;
///
/// assert_eq!(parse_duration("2:30"), Some(150));
/// assert_eq!(parse_duration("1.5h"), Some(90));
/// assert_eq!(parse_duration("30"), Some(30));
/// assert_eq!(parse_duration("0.5"), Some(30));
/// assert_eq!(parse_duration("2:75"), None);
/// ```
pub fn parse_duration(input: &str) -> Option<u32> {
    let text = input.trim().to_lowercase();
    if text.is_empty() {
        return None;
    }

    let raw_minutes = if let Some(caps) = COLON_PATTERN.captures(&text) {
        let hours: f64 = caps[1].parse().ok()?;
        let minutes: f64 = caps[2].parse().ok()?;
        if minutes >= 60.0 {
            tracing::trace!(input, "colon minutes out of range");
            return None;
        }
        hours * 60.0 + minutes
    } else if let Some(caps) = HOURS_PATTERN.captures(&text) {
        caps[1].parse::<f64>().ok()? * 60.0
    } else if let Some(caps) = MINUTES_PATTERN.captures(&text) {
        caps[1].parse::<f64>().ok()?
    } else if let Some(caps) = INTEGER_PATTERN.captures(&text) {
        caps[1].parse::<f64>().ok()?
    } else if let Some(caps) = DECIMAL_PATTERN.captures(&text) {
        // A unitless decimal is hours, a unitless integer is minutes.
        caps[1].parse::<f64>().ok()? * 60.0
    } else {
        tracing::trace!(input, "unrecognized duration format");
        return None;
    };

    round_to_quarter(raw_minutes)
}

/// Round raw minutes to the nearest quarter hour, halves rounding up.
///
/// Returns `None` for values that are negative, not finite, or too large to
/// represent.
pub fn round_to_quarter(raw_minutes: f64) -> Option<u32> {
    if !raw_minutes.is_finite() || raw_minutes < 0.0 {
        return None;
    }
    let quarter = f64::from(QUARTER_MINUTES);
    let rounded = (raw_minutes / quarter).round() * quarter;
    if rounded > f64::from(u32::MAX) {
        tracing::trace!(raw_minutes, "duration out of range");
        return None;
    }
    Some(rounded as u32)
}

/// Display canonical minutes as `H:MM`.
///
/// The output always parses back to the same value.
pub fn format_duration(minutes: u32) -> String {
    format!("{}:{:02}", minutes / 60, minutes % 60)
}

/// Display canonical minutes as decimal hours, e.g. `"1.5h"`.
pub fn format_hours(minutes: u32) -> String {
    format!("{}h", f64::from(minutes) / 60.0)
}

/// Enforce the booking minimum on a parse result.
pub fn validate_booking_minutes(parsed: Option<u32>) -> Result<u32, DurationError> {
    match parsed {
        None => Err(DurationError::Unparsable),
        Some(minutes) if minutes < MIN_BOOKING_MINUTES => {
            Err(DurationError::BelowMinimum(minutes))
        }
        Some(minutes) => Ok(minutes),
    }
}
