// libs/scheduling-cell/src/services/assembler.rs

use chrono::{DateTime, Utc};

use crate::error::SchedulingError;
use crate::models::{AppointmentStatus, BookingDecision, DaySchedule, Slot};

/// Order, dedup and partition the finished slot list. Lexicographic sort is
/// correct because every time is a zero-padded "HH:MM" string.
pub fn assemble_schedule(mut slots: Vec<Slot>) -> DaySchedule {
    slots.sort_by(|a, b| a.time.cmp(&b.time));
    slots.dedup_by(|a, b| a.time == b.time);

    let (preferred_slots, other_slots) = slots.into_iter().partition(|slot| slot.preferred);

    DaySchedule {
        preferred_slots,
        other_slots,
    }
}

/// The one state transition in this engine: a booking request starts approved
/// with an approval timestamp when the chosen slot is preferred, and pending
/// otherwise. Cancellation is an external mutation, never produced here.
pub fn decide_booking_status(
    schedule: &DaySchedule,
    time: &str,
    submitted_at: DateTime<Utc>,
) -> Result<BookingDecision, SchedulingError> {
    let slot = schedule
        .find_slot(time)
        .ok_or_else(|| SchedulingError::SlotNotFound(time.to_string()))?;

    if slot.preferred {
        Ok(BookingDecision {
            status: AppointmentStatus::Approved,
            auto_approved: true,
            approved_at: Some(submitted_at),
        })
    } else {
        Ok(BookingDecision {
            status: AppointmentStatus::Pending,
            auto_approved: false,
            approved_at: None,
        })
    }
}
