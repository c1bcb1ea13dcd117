// libs/scheduling-cell/tests/service_test.rs
//
// Integration tests for the fetch + pipeline path against a mocked PostgREST
// server.

use assert_matches::assert_matches;
use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scheduling_cell::error::SchedulingError;
use scheduling_cell::models::{AppointmentStatus, DaySchedule};
use scheduling_cell::services::schedule::SlotScheduleService;
use shared_config::AppConfig;

// ==============================================================================
// TEST FIXTURES AND UTILITIES
// ==============================================================================

const LOCATION: Uuid = Uuid::from_u128(0xA1);
const REP: Uuid = Uuid::from_u128(0xB2);

struct TestSetup {
    service: SlotScheduleService,
    mock_server: MockServer,
    auth_token: String,
}

impl TestSetup {
    async fn new() -> Self {
        let mock_server = MockServer::start().await;

        let config = AppConfig {
            supabase_url: mock_server.uri(),
            supabase_anon_key: "test-anon-key".to_string(),
        };

        Self {
            service: SlotScheduleService::new(&config),
            mock_server,
            auth_token: "test_token".to_string(),
        }
    }

    async fn mock_rows(&self, table: &str, rows: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path(format!("/rest/v1/{}", table)))
            .respond_with(ResponseTemplate::new(200).set_body_json(rows))
            .mount(&self.mock_server)
            .await;
    }

    /// Mount the standard Monday scenario: open 09:00-17:00, one preferred
    /// window 09:00-11:00, one provider on site 09:00-17:00, no bookings.
    async fn mount_monday_mocks(&self) {
        self.mock_rows(
            "office_hours",
            json!([{
                "id": Uuid::new_v4(),
                "location_id": LOCATION,
                "day_of_week": 1,
                "open_time": "09:00",
                "close_time": "17:00",
                "is_closed": false
            }]),
        )
        .await;

        self.mock_rows(
            "preferred_time_slots",
            json!([{
                "id": Uuid::new_v4(),
                "location_id": LOCATION,
                "day_of_week": 1,
                "start_time": "09:00",
                "end_time": "11:00",
                "is_active": true
            }]),
        )
        .await;

        self.mock_rows(
            "providers",
            json!([{
                "id": "00000000-0000-0000-0000-0000000000c3",
                "location_id": LOCATION,
                "first_name": "Ana",
                "last_name": "Lee",
                "credential": "MD"
            }]),
        )
        .await;

        self.mock_rows(
            "provider_availability",
            json!([{
                "provider_id": "00000000-0000-0000-0000-0000000000c3",
                "day_of_week": 1,
                "start_time": "09:00",
                "end_time": "17:00",
                "is_in_office_effective": true
            }]),
        )
        .await;

        self.mock_rows("appointments", json!([])).await;
    }

    /// Same scenario, but with an approved booking by the current rep at
    /// 10:00-11:00 and no providers.
    async fn mount_monday_mocks_with_booking(&self) {
        self.mock_rows(
            "office_hours",
            json!([{
                "id": Uuid::new_v4(),
                "location_id": LOCATION,
                "day_of_week": 1,
                "open_time": "09:00",
                "close_time": "17:00",
                "is_closed": false
            }]),
        )
        .await;
        self.mock_rows(
            "preferred_time_slots",
            json!([{
                "id": Uuid::new_v4(),
                "location_id": LOCATION,
                "day_of_week": 1,
                "start_time": "09:00",
                "end_time": "11:00",
                "is_active": true
            }]),
        )
        .await;
        self.mock_rows("providers", json!([])).await;
        self.mock_rows("provider_availability", json!([])).await;
        self.mock_rows(
            "appointments",
            json!([{
                "id": Uuid::new_v4(),
                "location_id": LOCATION,
                "medical_rep_id": REP,
                "start_at": "2025-06-02T10:00:00Z",
                "end_at": "2025-06-02T11:00:00Z",
                "status": "approved"
            }]),
        )
        .await;
    }

    async fn compute_monday(&self) -> Result<DaySchedule, SchedulingError> {
        // 2025-06-02 is a Monday; now is the Sunday before, so no past filtering.
        self.service
            .compute_slots(
                LOCATION,
                NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
                Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
                Some(REP),
                &self.auth_token,
            )
            .await
    }
}

fn times(slots: &[scheduling_cell::models::Slot]) -> Vec<&str> {
    slots.iter().map(|s| s.time.as_str()).collect()
}

// ==============================================================================
// SLOT COMPUTATION
// ==============================================================================

#[tokio::test]
async fn computes_full_monday_schedule() {
    let setup = TestSetup::new().await;
    setup.mount_monday_mocks().await;

    let schedule = setup.compute_monday().await.unwrap();

    assert_eq!(times(&schedule.preferred_slots), vec!["09:00", "10:00"]);
    assert_eq!(
        times(&schedule.other_slots),
        vec!["11:00", "12:00", "13:00", "14:00", "15:00", "16:00"]
    );
    for slot in schedule
        .preferred_slots
        .iter()
        .chain(schedule.other_slots.iter())
    {
        assert!(slot.available);
        assert_eq!(slot.available_providers, vec!["Ana Lee, MD"]);
    }
}

#[tokio::test]
async fn own_live_booking_flags_the_slot() {
    let setup = TestSetup::new().await;
    setup.mount_monday_mocks_with_booking().await;

    let schedule = setup.compute_monday().await.unwrap();

    let booked = schedule.find_slot("10:00").unwrap();
    assert!(booked.is_booked);
    assert!(booked.booked_by_current_user);
    assert!(!booked.available);

    let free = schedule.find_slot("09:00").unwrap();
    assert!(free.available);
}

#[tokio::test]
async fn sunday_request_never_surfaces_preferred_slots() {
    let setup = TestSetup::new().await;

    // The store has preferred rows and the office row says closed; a Sunday
    // request yields nothing from either source.
    setup
        .mock_rows(
            "office_hours",
            json!([{
                "id": Uuid::new_v4(),
                "location_id": LOCATION,
                "day_of_week": 0,
                "open_time": "09:00",
                "close_time": "17:00",
                "is_closed": true
            }]),
        )
        .await;
    setup
        .mock_rows(
            "preferred_time_slots",
            json!([{
                "id": Uuid::new_v4(),
                "location_id": LOCATION,
                "day_of_week": 1,
                "start_time": "09:00",
                "end_time": "11:00",
                "is_active": true
            }]),
        )
        .await;
    setup.mock_rows("providers", json!([])).await;
    setup.mock_rows("provider_availability", json!([])).await;
    setup.mock_rows("appointments", json!([])).await;

    let schedule = setup
        .service
        .compute_slots(
            LOCATION,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(), // Sunday
            Utc.with_ymd_and_hms(2025, 5, 31, 12, 0, 0).unwrap(),
            Some(REP),
            &setup.auth_token,
        )
        .await
        .unwrap();

    assert!(schedule.preferred_slots.is_empty());
    assert!(schedule.other_slots.is_empty());
}

#[tokio::test]
async fn malformed_office_row_degrades_to_no_general_slots() {
    let setup = TestSetup::new().await;

    // Row missing required fields fails deserialization and is skipped; the
    // preferred source still contributes.
    setup
        .mock_rows("office_hours", json!([{ "unexpected": true }]))
        .await;
    setup
        .mock_rows(
            "preferred_time_slots",
            json!([{
                "id": Uuid::new_v4(),
                "location_id": LOCATION,
                "day_of_week": 1,
                "start_time": "09:00",
                "end_time": "11:00",
                "is_active": true
            }]),
        )
        .await;
    setup.mock_rows("providers", json!([])).await;
    setup.mock_rows("provider_availability", json!([])).await;
    setup.mock_rows("appointments", json!([])).await;

    let schedule = setup.compute_monday().await.unwrap();
    assert_eq!(times(&schedule.preferred_slots), vec!["09:00", "10:00"]);
    assert!(schedule.other_slots.is_empty());
}

#[tokio::test]
async fn transport_failure_fails_the_refresh_cycle() {
    let setup = TestSetup::new().await;
    setup.mock_rows("office_hours", json!([])).await;
    setup.mock_rows("preferred_time_slots", json!([])).await;
    setup.mock_rows("providers", json!([])).await;
    setup.mock_rows("provider_availability", json!([])).await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/appointments"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&setup.mock_server)
        .await;

    let result = setup.compute_monday().await;
    assert_matches!(result, Err(SchedulingError::Database(_)));
}

// ==============================================================================
// BOOKING
// ==============================================================================

#[tokio::test]
async fn booking_a_preferred_slot_inserts_an_approved_appointment() {
    let setup = TestSetup::new().await;
    setup.mount_monday_mocks().await;

    let schedule = setup.compute_monday().await.unwrap();

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .and(body_partial_json(json!({
            "status": "approved",
            "auto_approved": true,
            "start_at": "2025-06-02T10:00:00+00:00",
            "end_at": "2025-06-02T11:00:00+00:00"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{
            "id": Uuid::new_v4(),
            "location_id": LOCATION,
            "medical_rep_id": REP,
            "start_at": "2025-06-02T10:00:00Z",
            "end_at": "2025-06-02T11:00:00Z",
            "status": "approved",
            "auto_approved": true,
            "approved_at": "2025-06-01T18:00:00Z"
        }])))
        .expect(1)
        .mount(&setup.mock_server)
        .await;

    let appointment = setup
        .service
        .book_slot(
            &schedule,
            LOCATION,
            REP,
            NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            "10:00",
            &setup.auth_token,
        )
        .await
        .unwrap();

    assert_eq!(appointment.status, AppointmentStatus::Approved);
    assert!(appointment.auto_approved);
    assert!(appointment.approved_at.is_some());
}

#[tokio::test]
async fn booking_a_general_slot_inserts_a_pending_appointment() {
    let setup = TestSetup::new().await;
    setup.mount_monday_mocks().await;

    let schedule = setup.compute_monday().await.unwrap();

    Mock::given(method("POST"))
        .and(path("/rest/v1/appointments"))
        .and(body_partial_json(json!({
            "status": "pending",
            "auto_approved": false,
            "approved_at": null
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{
            "id": Uuid::new_v4(),
            "location_id": LOCATION,
            "medical_rep_id": REP,
            "start_at": "2025-06-02T14:00:00Z",
            "end_at": "2025-06-02T15:00:00Z",
            "status": "pending"
        }])))
        .expect(1)
        .mount(&setup.mock_server)
        .await;

    let appointment = setup
        .service
        .book_slot(
            &schedule,
            LOCATION,
            REP,
            NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            "14:00",
            &setup.auth_token,
        )
        .await
        .unwrap();

    assert_eq!(appointment.status, AppointmentStatus::Pending);
    assert!(!appointment.auto_approved);
    assert_eq!(appointment.approved_at, None);
}

#[tokio::test]
async fn booking_an_unknown_time_is_rejected_without_a_write() {
    let setup = TestSetup::new().await;
    setup.mount_monday_mocks().await;

    let schedule = setup.compute_monday().await.unwrap();

    // No POST mock mounted: an attempted insert would fail the test through
    // the transport error instead of the expected SlotNotFound.
    let result = setup
        .service
        .book_slot(
            &schedule,
            LOCATION,
            REP,
            NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
            "23:00",
            &setup.auth_token,
        )
        .await;

    assert_matches!(result, Err(SchedulingError::SlotNotFound(_)));
}
