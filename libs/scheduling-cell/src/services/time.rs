// libs/scheduling-cell/src/services/time.rs
//
// Clock-time arithmetic over zero-padded "HH:MM" strings. The two functions
// are inverses for every minute offset in 0..1440.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};

use crate::error::SchedulingError;
use crate::models::SLOT_DURATION_MINUTES;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

/// Parse a 24-hour "HH:MM" string into minutes since midnight.
pub fn parse_time_to_minutes(time: &str) -> Result<u32, SchedulingError> {
    let (hours, minutes) = time
        .split_once(':')
        .ok_or_else(|| SchedulingError::InvalidTime(format!("expected HH:MM, got {:?}", time)))?;

    if hours.len() != 2 || minutes.len() != 2 {
        return Err(SchedulingError::InvalidTime(format!(
            "expected zero-padded HH:MM, got {:?}",
            time
        )));
    }

    let hours: u32 = hours
        .parse()
        .map_err(|_| SchedulingError::InvalidTime(format!("non-numeric hours in {:?}", time)))?;
    let minutes: u32 = minutes
        .parse()
        .map_err(|_| SchedulingError::InvalidTime(format!("non-numeric minutes in {:?}", time)))?;

    if hours >= 24 || minutes >= 60 {
        return Err(SchedulingError::InvalidTime(format!(
            "{:?} is out of 24-hour range",
            time
        )));
    }

    Ok(hours * 60 + minutes)
}

/// Format minutes since midnight back to a zero-padded "HH:MM" string.
/// Offsets at or past 24 hours are rejected rather than wrapped.
pub fn format_minutes_to_time(minutes: u32) -> Result<String, SchedulingError> {
    if minutes >= MINUTES_PER_DAY {
        return Err(SchedulingError::InvalidTime(format!(
            "{} minutes exceeds a single day",
            minutes
        )));
    }

    Ok(format!("{:02}:{:02}", minutes / 60, minutes % 60))
}

/// Absolute start of a slot: the date at midnight plus the slot's offset.
pub fn slot_start_at(date: NaiveDate, time: &str) -> Result<DateTime<Utc>, SchedulingError> {
    let minutes = parse_time_to_minutes(time)?;
    Ok(date.and_time(NaiveTime::MIN).and_utc() + Duration::minutes(minutes as i64))
}

/// Half-open `[start, end)` interval for a slot, both ends absolute.
pub fn slot_interval(
    date: NaiveDate,
    time: &str,
) -> Result<(DateTime<Utc>, DateTime<Utc>), SchedulingError> {
    let start = slot_start_at(date, time)?;
    let end = start + Duration::minutes(SLOT_DURATION_MINUTES as i64);
    Ok((start, end))
}
