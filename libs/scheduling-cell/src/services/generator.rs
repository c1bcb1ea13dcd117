// libs/scheduling-cell/src/services/generator.rs

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, warn};

use crate::models::{OfficeHours, PreferredWindow, Slot, SLOT_DURATION_MINUTES};

use super::time::{format_minutes_to_time, parse_time_to_minutes, slot_start_at};
use super::weekday;

/// Produce the raw candidate slot list for a date: preferred-window slots
/// (tagged) unioned with general office-hours slots, deduplicated against the
/// preferred set. A window or office row with a malformed time contributes
/// nothing; it never aborts generation for the whole date.
pub fn generate_candidate_slots(
    date: NaiveDate,
    office_hours: Option<&OfficeHours>,
    preferred_windows: &[PreferredWindow],
    now: DateTime<Utc>,
) -> Vec<Slot> {
    let mut slots = Vec::new();
    let mut preferred_times: HashSet<String> = HashSet::new();

    // Sunday has no value in the preferred-window numbering, so preferred
    // rows are ignored for it no matter what the store holds.
    let preferred_windows: &[PreferredWindow] = if weekday::reconcile(date).preferred_day.is_none()
    {
        &[]
    } else {
        preferred_windows
    };

    for window in preferred_windows.iter().filter(|w| w.is_active) {
        let (start, end) = match (
            parse_time_to_minutes(&window.start_time),
            parse_time_to_minutes(&window.end_time),
        ) {
            (Ok(start), Ok(end)) => (start, end),
            _ => {
                warn!(
                    "Skipping preferred window {} with malformed times {} - {}",
                    window.id, window.start_time, window.end_time
                );
                continue;
            }
        };

        let mut current = start;
        // Strict boundary: a partial stride past the window end is never emitted.
        while current + SLOT_DURATION_MINUTES <= end {
            if let Ok(time) = format_minutes_to_time(current) {
                if preferred_times.insert(time.clone()) {
                    slots.push(Slot::new(time, true));
                }
            }
            current += SLOT_DURATION_MINUTES;
        }
    }

    if let Some(hours) = office_hours.filter(|h| !h.is_closed) {
        if let (Some(open_time), Some(close_time)) =
            (hours.open_time.as_deref(), hours.close_time.as_deref())
        {
            match (
                parse_time_to_minutes(open_time),
                parse_time_to_minutes(close_time),
            ) {
                (Ok(open), Ok(close)) => {
                    let mut current = open;
                    while current + SLOT_DURATION_MINUTES <= close {
                        if let Ok(time) = format_minutes_to_time(current) {
                            if !preferred_times.contains(&time) {
                                slots.push(Slot::new(time, false));
                            }
                        }
                        current += SLOT_DURATION_MINUTES;
                    }
                }
                _ => {
                    warn!(
                        "Skipping office hours {} with malformed times {} - {}",
                        hours.id, open_time, close_time
                    );
                }
            }
        }
    }

    // Past-time filtering applies only when the target date is today.
    if date == now.date_naive() {
        slots.retain(|slot| match slot_start_at(date, &slot.time) {
            Ok(start) => start > now,
            Err(_) => false,
        });
    }

    debug!("Generated {} candidate slots for {}", slots.len(), date);
    slots
}
