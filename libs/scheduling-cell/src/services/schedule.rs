// libs/scheduling-cell/src/services/schedule.rs

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::error::SchedulingError;
use crate::models::{
    Appointment, DaySchedule, OfficeHours, PreferredWindow, Provider, ProviderAvailability,
};

use super::assembler::{assemble_schedule, decide_booking_status};
use super::generator::generate_candidate_slots;
use super::overlap::resolve_booked_slots;
use super::providers::attach_provider_names;
use super::time::slot_interval;
use super::weekday;

/// Run the full slot pipeline over already-fetched rows. Pure and synchronous;
/// the service wraps it with the persistence reads.
#[allow(clippy::too_many_arguments)]
pub fn compute_schedule(
    date: NaiveDate,
    now: DateTime<Utc>,
    office_hours: Option<&OfficeHours>,
    preferred_windows: &[PreferredWindow],
    providers: &[Provider],
    provider_availability: &[ProviderAvailability],
    appointments: &[Appointment],
    current_rep_id: Option<Uuid>,
) -> DaySchedule {
    let mut slots = generate_candidate_slots(date, office_hours, preferred_windows, now);
    resolve_booked_slots(&mut slots, date, appointments, current_rep_id);
    attach_provider_names(&mut slots, providers, provider_availability);
    assemble_schedule(slots)
}

pub struct SlotScheduleService {
    supabase: SupabaseClient,
}

impl SlotScheduleService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Compute the bookable slots for a location and date. The five reads are
    /// independent, so they are issued concurrently and the pipeline runs only
    /// once all of them land. Callers must pass a fresh `now` and re-invoke on
    /// every refresh; a stale appointment list here is a correctness bug, not
    /// a staleness annoyance.
    pub async fn compute_slots(
        &self,
        location_id: Uuid,
        date: NaiveDate,
        now: DateTime<Utc>,
        current_rep_id: Option<Uuid>,
        auth_token: &str,
    ) -> Result<DaySchedule, SchedulingError> {
        let weekdays = weekday::reconcile(date);
        debug!(
            "Computing slots for location {} on {} (office day {}, preferred day {:?})",
            location_id, date, weekdays.office_day, weekdays.preferred_day
        );

        let (office_hours, preferred_windows, providers, provider_availability, appointments) =
            tokio::try_join!(
                self.fetch_office_hours(location_id, weekdays.office_day, auth_token),
                self.fetch_preferred_windows(location_id, weekdays.preferred_day, auth_token),
                self.fetch_active_providers(location_id, auth_token),
                self.fetch_provider_availability(location_id, weekdays.office_day, auth_token),
                self.fetch_live_appointments(location_id, date, auth_token),
            )?;

        Ok(compute_schedule(
            date,
            now,
            office_hours.as_ref(),
            &preferred_windows,
            &providers,
            &provider_availability,
            &appointments,
            current_rep_id,
        ))
    }

    /// Submit a booking for a slot in a just-computed schedule. The initial
    /// status comes from the slot's preferred flag; the insert itself is a
    /// single write, and the uniqueness guarantee against two reps racing for
    /// one slot lives in the persistence layer, not here.
    pub async fn book_slot(
        &self,
        schedule: &DaySchedule,
        location_id: Uuid,
        medical_rep_id: Uuid,
        date: NaiveDate,
        time: &str,
        auth_token: &str,
    ) -> Result<Appointment, SchedulingError> {
        let submitted_at = Utc::now();
        let decision = decide_booking_status(schedule, time, submitted_at)?;

        if let Some(slot) = schedule.find_slot(time) {
            if !slot.available {
                warn!(
                    "Booking requested for unavailable slot {} on {} at location {}",
                    time, date, location_id
                );
            }
        }

        let (start_at, end_at) = slot_interval(date, time)?;

        let appointment_data = json!({
            "location_id": location_id,
            "medical_rep_id": medical_rep_id,
            "start_at": start_at.to_rfc3339(),
            "end_at": end_at.to_rfc3339(),
            "status": decision.status.to_string(),
            "auto_approved": decision.auto_approved,
            "approved_at": decision.approved_at.map(|at| at.to_rfc3339()),
        });

        let result: Vec<Value> = self
            .supabase
            .insert_returning("/rest/v1/appointments", Some(auth_token), appointment_data)
            .await
            .map_err(|e| SchedulingError::Database(e.to_string()))?;

        let row = result
            .into_iter()
            .next()
            .ok_or_else(|| SchedulingError::Database("Failed to create appointment".to_string()))?;

        serde_json::from_value(row)
            .map_err(|e| SchedulingError::Database(format!("Failed to parse appointment: {}", e)))
    }

    // Private fetch helpers. Each one skips malformed rows with a warning so a
    // single bad record degrades that source to fewer rows instead of failing
    // the whole refresh; transport and auth errors still propagate.

    async fn fetch_office_hours(
        &self,
        location_id: Uuid,
        office_day: u32,
        auth_token: &str,
    ) -> Result<Option<OfficeHours>, SchedulingError> {
        let path = format!(
            "/rest/v1/office_hours?location_id=eq.{}&day_of_week=eq.{}",
            location_id, office_day
        );
        let rows = self.fetch_rows(&path, auth_token).await?;

        // At most one row per (location, weekday); a missing row means no
        // general slots that day.
        Ok(rows
            .into_iter()
            .filter_map(|row| deserialize_row(row, "office_hours"))
            .next())
    }

    async fn fetch_preferred_windows(
        &self,
        location_id: Uuid,
        preferred_day: Option<u32>,
        auth_token: &str,
    ) -> Result<Vec<PreferredWindow>, SchedulingError> {
        // Sunday has no preferred-window numbering; skip the lookup entirely.
        let Some(day) = preferred_day else {
            return Ok(Vec::new());
        };

        let path = format!(
            "/rest/v1/preferred_time_slots?location_id=eq.{}&day_of_week=eq.{}&is_active=eq.true&order=start_time.asc",
            location_id, day
        );
        let rows = self.fetch_rows(&path, auth_token).await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| deserialize_row(row, "preferred_time_slots"))
            .collect())
    }

    async fn fetch_active_providers(
        &self,
        location_id: Uuid,
        auth_token: &str,
    ) -> Result<Vec<Provider>, SchedulingError> {
        let path = format!(
            "/rest/v1/providers?location_id=eq.{}&status=eq.active",
            location_id
        );
        let rows = self.fetch_rows(&path, auth_token).await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| deserialize_row(row, "providers"))
            .collect())
    }

    async fn fetch_provider_availability(
        &self,
        location_id: Uuid,
        office_day: u32,
        auth_token: &str,
    ) -> Result<Vec<ProviderAvailability>, SchedulingError> {
        let path = format!(
            "/rest/v1/provider_availability?location_id=eq.{}&day_of_week=eq.{}&is_in_office_effective=eq.true",
            location_id, office_day
        );
        let rows = self.fetch_rows(&path, auth_token).await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| deserialize_row(row, "provider_availability"))
            .collect())
    }

    async fn fetch_live_appointments(
        &self,
        location_id: Uuid,
        date: NaiveDate,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, SchedulingError> {
        let day_start = date.and_time(NaiveTime::MIN).and_utc();
        let day_end = day_start + Duration::days(1);

        // Cancelled and rejected bookings must never block availability, so
        // they are filtered at fetch time (and re-checked by the resolver).
        let path = format!(
            "/rest/v1/appointments?location_id=eq.{}&start_at=gte.{}&start_at=lt.{}&status=in.(pending,approved,completed)&order=start_at.asc",
            location_id,
            day_start.to_rfc3339(),
            day_end.to_rfc3339()
        );
        let rows = self.fetch_rows(&path, auth_token).await?;

        Ok(rows
            .into_iter()
            .filter_map(|row| deserialize_row(row, "appointments"))
            .collect())
    }

    async fn fetch_rows(
        &self,
        path: &str,
        auth_token: &str,
    ) -> Result<Vec<Value>, SchedulingError> {
        self.supabase
            .request(Method::GET, path, Some(auth_token), None)
            .await
            .map_err(|e| SchedulingError::Database(e.to_string()))
    }
}

fn deserialize_row<T: DeserializeOwned>(row: Value, table: &str) -> Option<T> {
    match serde_json::from_value(row) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Skipping malformed {} row: {}", table, e);
            None
        }
    }
}
