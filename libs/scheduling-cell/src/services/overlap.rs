// libs/scheduling-cell/src/services/overlap.rs

use chrono::NaiveDate;
use tracing::debug;
use uuid::Uuid;

use crate::models::{Appointment, Slot};

use super::time::slot_interval;

/// Mark each candidate slot booked or available against the day's live
/// appointments. The first overlapping live appointment owns the slot; no
/// further appointments are checked for it.
pub fn resolve_booked_slots(
    slots: &mut [Slot],
    date: NaiveDate,
    appointments: &[Appointment],
    current_rep_id: Option<Uuid>,
) {
    let mut booked = 0;

    for slot in slots.iter_mut() {
        let (slot_start, slot_end) = match slot_interval(date, &slot.time) {
            Ok(interval) => interval,
            Err(_) => continue,
        };

        for appointment in appointments {
            // The fetch already filters to live statuses; re-check here anyway
            // since a cancelled booking blocking a slot is a double-booking
            // hazard in the other direction.
            if !appointment.status.is_live() {
                continue;
            }

            let appointment_start = appointment.start_at;
            let appointment_end = appointment.effective_end_at();

            // Half-open overlap: touching endpoints do not conflict.
            if appointment_start < slot_end && appointment_end > slot_start {
                slot.is_booked = true;
                slot.available = false;
                slot.booked_by_current_user =
                    current_rep_id == Some(appointment.medical_rep_id);
                booked += 1;
                break;
            }
        }
    }

    debug!("{} of {} slots booked on {}", booked, slots.len(), date);
}
