//! Tests for the booking orchestrator.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use mockable::MockClock;
use serde_json::Value;

use super::*;
use crate::domain::ids::{ClientId, ModelId, ServiceId};
use crate::domain::money::Money;
use crate::domain::ports::{
    BookingRequest, MockAppointmentRepository, MockClientRepository, MockProcedureRunner,
    MockServiceCatalog, ProcedureError,
};
use crate::domain::schedule::Slot;
use crate::domain::{AppointmentStatus, ErrorCode};

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 2, 1, 10, 0, 0)
        .single()
        .expect("valid fixed instant")
}

fn fixed_clock() -> Arc<MockClock> {
    let mut clock = MockClock::new();
    clock.expect_utc().return_const(fixed_now());
    Arc::new(clock)
}

fn booking_date() -> NaiveDate {
    "2025-03-01".parse().expect("valid date")
}

fn slot(label: &str) -> Slot {
    label.parse().expect("valid slot")
}

fn money(raw: &str) -> Money {
    raw.parse().expect("valid amount")
}

fn sample_request(model_id: ModelId, service_id: ServiceId) -> BookingRequest {
    BookingRequest {
        model_id,
        service_id,
        date: booking_date(),
        slot: slot("10:00"),
        client_name: "Ana".to_owned(),
        client_phone: Some("111".to_owned()),
        client_email: None,
    }
}

fn sample_offering(model_id: ModelId, service_id: ServiceId) -> ServiceOffering {
    ServiceOffering {
        id: service_id,
        model_id,
        name: "Photo session".to_owned(),
        price: money("200.00"),
        duration_minutes: 60,
        max_people: 1,
        is_active: true,
    }
}

struct Mocks {
    clients: MockClientRepository,
    catalog: MockServiceCatalog,
    appointments: MockAppointmentRepository,
    procedures: MockProcedureRunner,
}

impl Mocks {
    fn new() -> Self {
        Self {
            clients: MockClientRepository::new(),
            catalog: MockServiceCatalog::new(),
            appointments: MockAppointmentRepository::new(),
            procedures: MockProcedureRunner::new(),
        }
    }

    fn into_service(
        self,
    ) -> BookingService<
        MockClientRepository,
        MockServiceCatalog,
        MockAppointmentRepository,
        MockProcedureRunner,
    > {
        BookingService::new(
            Arc::new(self.clients),
            Arc::new(self.catalog),
            Arc::new(self.appointments),
            Arc::new(self.procedures),
            fixed_clock(),
        )
    }
}

#[tokio::test]
async fn booking_snapshots_price_and_duration_from_the_offering() {
    let model_id = ModelId::random();
    let service_id = ServiceId::random();
    let offering = sample_offering(model_id, service_id);

    let mut mocks = Mocks::new();
    mocks
        .clients
        .expect_find_by_contact()
        .times(1)
        .return_once(|_| Ok(None));
    mocks.clients.expect_insert().times(1).return_once(|_| Ok(()));
    mocks
        .catalog
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(offering)));
    mocks
        .appointments
        .expect_insert()
        .times(1)
        .withf(|appointment| {
            appointment.price == "200.00".parse().expect("valid amount")
                && appointment.duration_minutes == 60
                && appointment.status == AppointmentStatus::Pending
                && !appointment.created_by_admin
        })
        .return_once(|_| Ok(()));
    mocks
        .procedures
        .expect_invoke()
        .times(1)
        .return_once(|_, _| Ok(Value::Null));

    let confirmation = mocks
        .into_service()
        .book(sample_request(model_id, service_id))
        .await
        .expect("booking succeeds");

    assert_eq!(confirmation.price, money("200.00"));
    assert_eq!(confirmation.duration_minutes, 60);
    assert_eq!(confirmation.status, AppointmentStatus::Pending);
    assert_eq!(confirmation.payment_status, PaymentStatus::Pending);
    assert!(confirmation.awaiting_confirmation);
}

#[tokio::test]
async fn repeat_contact_reuses_the_existing_client() {
    let model_id = ModelId::random();
    let service_id = ServiceId::random();
    let offering = sample_offering(model_id, service_id);

    let contact = ClientContact::new("Ana", Some("111")).expect("valid contact");
    let existing = Client::from_contact(&contact, None);
    let existing_id = existing.id;

    let mut mocks = Mocks::new();
    mocks
        .clients
        .expect_find_by_contact()
        .times(1)
        .withf(|key| key.name() == "Ana" && key.phone() == Some("111"))
        .return_once(move |_| Ok(Some(existing)));
    mocks.clients.expect_insert().times(0);
    mocks
        .catalog
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(offering)));
    mocks
        .appointments
        .expect_insert()
        .times(1)
        .return_once(|_| Ok(()));
    mocks
        .procedures
        .expect_invoke()
        .times(1)
        .return_once(|_, _| Ok(Value::Null));

    let confirmation = mocks
        .into_service()
        .book(sample_request(model_id, service_id))
        .await
        .expect("booking succeeds");

    assert_eq!(confirmation.client_id, existing_id);
}

#[tokio::test]
async fn blank_client_name_fails_before_any_remote_call() {
    let mut mocks = Mocks::new();
    mocks.clients.expect_find_by_contact().times(0);
    mocks.clients.expect_insert().times(0);
    mocks.catalog.expect_find_by_id().times(0);
    mocks.appointments.expect_insert().times(0);
    mocks.procedures.expect_invoke().times(0);

    let mut request = sample_request(ModelId::random(), ServiceId::random());
    request.client_name = "   ".to_owned();

    let error = mocks
        .into_service()
        .book(request)
        .await
        .expect_err("validation fails");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn same_day_slot_inside_lead_time_is_rejected() {
    let mut mocks = Mocks::new();
    mocks.clients.expect_find_by_contact().times(0);
    mocks.appointments.expect_insert().times(0);
    mocks.catalog.expect_find_by_id().times(0);
    mocks.procedures.expect_invoke().times(0);

    // Clock is fixed at 2025-02-01 10:00; a 10:30 slot that day is under the
    // one-hour lead time.
    let mut request = sample_request(ModelId::random(), ServiceId::random());
    request.date = "2025-02-01".parse().expect("valid date");
    request.slot = slot("10:30");

    let error = mocks
        .into_service()
        .book(request)
        .await
        .expect_err("lead time violated");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn unknown_offering_aborts_before_appointment_creation() {
    let mut mocks = Mocks::new();
    mocks
        .clients
        .expect_find_by_contact()
        .times(1)
        .return_once(|_| Ok(None));
    mocks.clients.expect_insert().times(1).return_once(|_| Ok(()));
    mocks
        .catalog
        .expect_find_by_id()
        .times(1)
        .return_once(|_| Ok(None));
    mocks.appointments.expect_insert().times(0);
    mocks.procedures.expect_invoke().times(0);

    let error = mocks
        .into_service()
        .book(sample_request(ModelId::random(), ServiceId::random()))
        .await
        .expect_err("offering missing");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn inactive_offering_is_rejected() {
    let model_id = ModelId::random();
    let service_id = ServiceId::random();
    let mut offering = sample_offering(model_id, service_id);
    offering.is_active = false;

    let mut mocks = Mocks::new();
    mocks
        .clients
        .expect_find_by_contact()
        .times(1)
        .return_once(|_| Ok(None));
    mocks.clients.expect_insert().times(1).return_once(|_| Ok(()));
    mocks
        .catalog
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(offering)));
    mocks.appointments.expect_insert().times(0);
    mocks.procedures.expect_invoke().times(0);

    let error = mocks
        .into_service()
        .book(sample_request(model_id, service_id))
        .await
        .expect_err("inactive offering");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn offering_of_another_model_is_rejected() {
    let service_id = ServiceId::random();
    let offering = sample_offering(ModelId::random(), service_id);

    let mut mocks = Mocks::new();
    mocks
        .clients
        .expect_find_by_contact()
        .times(1)
        .return_once(|_| Ok(None));
    mocks.clients.expect_insert().times(1).return_once(|_| Ok(()));
    mocks
        .catalog
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(offering)));
    mocks.appointments.expect_insert().times(0);
    mocks.procedures.expect_invoke().times(0);

    let error = mocks
        .into_service()
        .book(sample_request(ModelId::random(), service_id))
        .await
        .expect_err("model mismatch");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn failed_insert_surfaces_error_and_skips_notification() {
    let model_id = ModelId::random();
    let service_id = ServiceId::random();
    let offering = sample_offering(model_id, service_id);

    let mut mocks = Mocks::new();
    mocks
        .clients
        .expect_find_by_contact()
        .times(1)
        .return_once(|_| Ok(None));
    mocks.clients.expect_insert().times(1).return_once(|_| Ok(()));
    mocks
        .catalog
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(offering)));
    mocks
        .appointments
        .expect_insert()
        .times(1)
        .return_once(|_| Err(AppointmentRepositoryError::connection("pool down")));
    mocks.procedures.expect_invoke().times(0);

    let error = mocks
        .into_service()
        .book(sample_request(model_id, service_id))
        .await
        .expect_err("insert fails");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn notification_failure_does_not_fail_the_booking() {
    let model_id = ModelId::random();
    let service_id = ServiceId::random();
    let offering = sample_offering(model_id, service_id);

    let mut mocks = Mocks::new();
    mocks
        .clients
        .expect_find_by_contact()
        .times(1)
        .return_once(|_| Ok(None));
    mocks.clients.expect_insert().times(1).return_once(|_| Ok(()));
    mocks
        .catalog
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(offering)));
    mocks
        .appointments
        .expect_insert()
        .times(1)
        .return_once(|_| Ok(()));
    mocks
        .procedures
        .expect_invoke()
        .times(1)
        .return_once(|name, _| Err(ProcedureError::rejected(name, "bridge offline")));

    mocks
        .into_service()
        .book(sample_request(model_id, service_id))
        .await
        .expect("booking still succeeds");
}

#[tokio::test]
async fn future_date_ignores_current_time_of_day() {
    let model_id = ModelId::random();
    let service_id = ServiceId::random();
    let offering = sample_offering(model_id, service_id);

    let mut mocks = Mocks::new();
    mocks
        .clients
        .expect_find_by_contact()
        .times(1)
        .return_once(|_| Ok(None));
    mocks.clients.expect_insert().times(1).return_once(|_| Ok(()));
    mocks
        .catalog
        .expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(Some(offering)));
    mocks
        .appointments
        .expect_insert()
        .times(1)
        .return_once(|_| Ok(()));
    mocks
        .procedures
        .expect_invoke()
        .times(1)
        .return_once(|_, _| Ok(Value::Null));

    // 09:00 next month would violate lead time if it were today.
    let mut request = sample_request(model_id, service_id);
    request.slot = slot("09:00");

    mocks
        .into_service()
        .book(request)
        .await
        .expect("future-day 09:00 slot books fine");
}
