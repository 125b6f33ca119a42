//! Backend datetime values such as `20240115T101500,25-05`

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime, TimeZone};

/// Parse a backend datetime. Values without a zone are taken as UTC, a bare
/// date as midnight. Time-only values have no instant and yield `None`.
pub fn parse_datetime(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    let (date_part, time_part) = match raw.split_once('T') {
        Some((date, time)) => (date, Some(time)),
        None => (raw, None),
    };
    if date_part.is_empty() {
        return None;
    }

    let date = NaiveDate::parse_from_str(date_part, "%Y%m%d").ok()?;
    let (time, offset) = match time_part {
        Some(time) => parse_time(time)?,
        None => (NaiveTime::MIN, 0),
    };

    let zone = FixedOffset::east_opt(offset)?;
    zone.from_local_datetime(&date.and_time(time)).single()
}

/// Split `HHMMSS[,hh][(+|-)HH[MM]]` into a time of day and an offset in seconds
fn parse_time(text: &str) -> Option<(NaiveTime, i32)> {
    let zone_at = text.find(['+', '-']);
    let (clock, zone) = match zone_at {
        Some(at) => (&text[..at], Some(&text[at..])),
        None => (text, None),
    };

    let (hms, hundredths) = match clock.split_once(',') {
        Some((hms, fraction)) => (hms, parse_hundredths(fraction)?),
        None => (clock, 0),
    };
    let time = NaiveTime::parse_from_str(hms, "%H%M%S").ok()?
        + Duration::milliseconds(hundredths * 10);

    let offset = match zone {
        Some(zone) => parse_offset(zone)?,
        None => 0,
    };
    Some((time, offset))
}

/// One or two digits of hundredths of a second
fn parse_hundredths(fraction: &str) -> Option<i64> {
    if fraction.is_empty() || fraction.len() > 2 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    fraction.parse().ok()
}

fn parse_offset(zone: &str) -> Option<i32> {
    let sign = if zone.starts_with('-') { -1 } else { 1 };
    let digits = &zone[1..];
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let (hours, minutes) = match digits.len() {
        2 => (digits.parse::<i32>().ok()?, 0),
        4 => (digits[..2].parse::<i32>().ok()?, digits[2..].parse::<i32>().ok()?),
        _ => return None,
    };
    Some(sign * (hours * 3600 + minutes * 60))
}
