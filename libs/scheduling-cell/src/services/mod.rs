pub mod assembler;
pub mod generator;
pub mod overlap;
pub mod providers;
pub mod schedule;
pub mod time;
pub mod weekday;

pub use assembler::{assemble_schedule, decide_booking_status};
pub use generator::generate_candidate_slots;
pub use overlap::resolve_booked_slots;
pub use providers::attach_provider_names;
pub use schedule::{compute_schedule, SlotScheduleService};
pub use weekday::{reconcile, WeekdayNumbers};
