// libs/scheduling-cell/src/models.rs
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use std::fmt;

/// All slots are one hour in this design; the constant is threaded through
/// the generator and the overlap resolver rather than configured.
pub const SLOT_DURATION_MINUTES: u32 = 60;

// ==============================================================================
// PERSISTENCE ROW MODELS
// ==============================================================================

/// Opening hours for a location on one weekday (0 = Sunday .. 6 = Saturday).
/// A closed day, or a day missing either time, yields no general slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfficeHours {
    pub id: Uuid,
    pub location_id: Uuid,
    pub day_of_week: i32, // 0 = Sunday, 1 = Monday, etc.
    pub open_time: Option<String>,  // "HH:MM"
    pub close_time: Option<String>, // "HH:MM"
    pub is_closed: bool,
}

/// An office-declared window whose slots auto-approve when booked.
/// Keyed by the Monday-based weekday (1 = Monday .. 6 = Saturday); Sunday has
/// no valid value because offices are always closed Sunday.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreferredWindow {
    pub id: Uuid,
    pub location_id: Uuid,
    pub day_of_week: i32, // 1 = Monday .. 6 = Saturday
    pub start_time: String, // "HH:MM"
    pub end_time: String,   // "HH:MM"
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    pub id: Uuid,
    pub location_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub credential: Option<String>,
}

impl Provider {
    /// Display name shown on slots: "First Last" or "First Last, Credential".
    pub fn display_name(&self) -> String {
        match self.credential.as_deref() {
            Some(credential) if !credential.is_empty() => {
                format!("{} {}, {}", self.first_name, self.last_name, credential)
            }
            _ => format!("{} {}", self.first_name, self.last_name),
        }
    }
}

/// A provider's on-site working window for one weekday (Sunday-based
/// numbering, same as `OfficeHours`). At most one window per provider per day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderAvailability {
    pub provider_id: Uuid,
    pub day_of_week: i32, // 0 = Sunday, 1 = Monday, etc.
    pub start_time: String, // "HH:MM"
    pub end_time: String,   // "HH:MM"
    pub is_in_office_effective: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub location_id: Uuid,
    pub medical_rep_id: Uuid,
    pub start_at: DateTime<Utc>,
    pub end_at: Option<DateTime<Utc>>,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub auto_approved: bool,
    #[serde(default)]
    pub approved_at: Option<DateTime<Utc>>,
}

impl Appointment {
    /// End of the booked interval; open-ended rows occupy one slot length.
    pub fn effective_end_at(&self) -> DateTime<Utc> {
        self.end_at.unwrap_or_else(|| {
            self.start_at + chrono::Duration::minutes(SLOT_DURATION_MINUTES as i64)
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Pending,
    Approved,
    Completed,
    Cancelled,
    Rejected,
}

impl AppointmentStatus {
    /// Live appointments occupy calendar time; cancelled and rejected ones
    /// never block a slot.
    pub fn is_live(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Pending
                | AppointmentStatus::Approved
                | AppointmentStatus::Completed
        )
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Pending => write!(f, "pending"),
            AppointmentStatus::Approved => write!(f, "approved"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::Rejected => write!(f, "rejected"),
        }
    }
}

// ==============================================================================
// ENGINE OUTPUT MODELS
// ==============================================================================

/// A candidate one-hour opening for a location and date. Built fresh on every
/// computation, never persisted. `time` is the unique key within a day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    pub time: String, // "HH:MM"
    pub duration_minutes: u32,
    pub preferred: bool,
    pub available: bool,
    pub is_booked: bool,
    pub booked_by_current_user: bool,
    pub available_providers: Vec<String>,
}

impl Slot {
    pub fn new(time: String, preferred: bool) -> Self {
        Self {
            time,
            duration_minutes: SLOT_DURATION_MINUTES,
            preferred,
            available: true,
            is_booked: false,
            booked_by_current_user: false,
            available_providers: Vec::new(),
        }
    }
}

/// The per-date result set, partitioned for display grouping. Both partitions
/// are sorted ascending by time and share no slot time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DaySchedule {
    pub preferred_slots: Vec<Slot>,
    pub other_slots: Vec<Slot>,
}

impl DaySchedule {
    pub fn find_slot(&self, time: &str) -> Option<&Slot> {
        self.preferred_slots
            .iter()
            .chain(self.other_slots.iter())
            .find(|slot| slot.time == time)
    }

    pub fn is_empty(&self) -> bool {
        self.preferred_slots.is_empty() && self.other_slots.is_empty()
    }
}

/// Initial state of a booking request, decided by the chosen slot's
/// preferred flag at submission time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingDecision {
    pub status: AppointmentStatus,
    pub auto_approved: bool,
    pub approved_at: Option<DateTime<Utc>>,
}
