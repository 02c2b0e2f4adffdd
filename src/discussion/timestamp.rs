//! Decoding of human-readable post date labels
//!
//! Discussion pages render dates as labels such as `Just now`,
//! `5 minutes ago`, `14 Mar @ 3:52pm` or `14 Mar, 2019 @ 3:52pm`. Labels
//! without a year belong to the current year. All labels are read as UTC.

use chrono::{DateTime, Datelike, Duration, NaiveDateTime, Utc};

/// Turns a date label into a timestamp
pub trait TimestampDecoder: Send + Sync {
    /// Decodes `label`, returning `None` if it is not understood
    fn decode(&self, label: &str) -> Option<DateTime<Utc>>;
}

/// Decoder for the English labels rendered by Steam Community pages
#[derive(Debug, Clone, Copy, Default)]
pub struct SteamTimeDecoder;

impl TimestampDecoder for SteamTimeDecoder {
    fn decode(&self, label: &str) -> Option<DateTime<Utc>> {
        decode_at(label, Utc::now())
    }
}

/// Accepted layouts once the year has been filled in
const ABSOLUTE_FORMATS: [&str; 2] = ["%d %b, %Y %I:%M%p", "%b %d, %Y %I:%M%p"];

/// Decodes a label relative to the given `now`
pub fn decode_at(label: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let label = label.trim();

    if let Some((date, time)) = label.split_once('@') {
        return decode_absolute(date.trim(), time.trim(), now.year());
    }

    decode_relative(label, now)
}

fn decode_absolute(date: &str, time: &str, current_year: i32) -> Option<DateTime<Utc>> {
    let date = if date.contains(',') {
        date.to_string()
    } else {
        format!("{}, {}", date, current_year)
    };
    let combined = format!("{} {}", date, time.replace(' ', ""));

    ABSOLUTE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(&combined, format).ok())
        .map(|naive| naive.and_utc())
}

fn decode_relative(label: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    if label.eq_ignore_ascii_case("just now") {
        return Some(now);
    }

    let mut words = label.split_whitespace();
    let amount: i64 = words.next()?.parse().ok().filter(|n: &i64| *n >= 0)?;
    let unit = words.next()?.to_ascii_lowercase();
    if !words.next()?.eq_ignore_ascii_case("ago") || words.next().is_some() {
        return None;
    }

    let offset = match unit.as_str() {
        "minute" | "minutes" => Duration::try_minutes(amount)?,
        "hour" | "hours" => Duration::try_hours(amount)?,
        _ => return None,
    };

    // Amounts past the representable range are not a date
    now.checked_sub_signed(offset)
}
