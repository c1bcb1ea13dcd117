// libs/scheduling-cell/src/services/providers.rs

use tracing::warn;

use crate::models::{Provider, ProviderAvailability, Slot, SLOT_DURATION_MINUTES};

use super::time::parse_time_to_minutes;

/// Attach to each slot the display names of providers whose in-office window
/// intersects it. Names keep the order providers were supplied in. A provider
/// with no window for the day contributes nothing.
pub fn attach_provider_names(
    slots: &mut [Slot],
    providers: &[Provider],
    availability: &[ProviderAvailability],
) {
    for slot in slots.iter_mut() {
        let slot_start = match parse_time_to_minutes(&slot.time) {
            Ok(minutes) => minutes,
            Err(_) => continue,
        };
        let slot_end = slot_start + SLOT_DURATION_MINUTES;

        for provider in providers {
            // At most one in-office window per provider per day in this model.
            let window = availability
                .iter()
                .find(|a| a.provider_id == provider.id && a.is_in_office_effective);
            let Some(window) = window else { continue };

            let (window_start, window_end) = match (
                parse_time_to_minutes(&window.start_time),
                parse_time_to_minutes(&window.end_time),
            ) {
                (Ok(start), Ok(end)) => (start, end),
                _ => {
                    warn!(
                        "Skipping availability window with malformed times for provider {}",
                        provider.id
                    );
                    continue;
                }
            };

            if slot_start < window_end && slot_end > window_start {
                slot.available_providers.push(provider.display_name());
            }
        }
    }
}
