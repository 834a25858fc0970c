//! Public booking API handlers.
//!
//! ```text
//! POST /api/v1/bookings
//!   {"modelId":"...","serviceId":"...","date":"2025-03-01","slot":"10:00",
//!    "clientName":"Ana","clientPhone":"111"}
//! ```

use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::domain::ids::{ModelId, ServiceId};
use crate::domain::ports::{BookingConfirmation, BookingRequest};
use crate::domain::Error;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_date, parse_slot, parse_uuid, FieldName};
use crate::inbound::http::ApiResult;

/// Booking request body for `POST /api/v1/bookings`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingBody {
    /// The model whose diary is being booked.
    #[schema(value_type = String, example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub model_id: String,
    /// The service offering to book.
    #[schema(value_type = String, example = "8c5f64ab-1717-4562-b3fc-2c963f66afa6")]
    pub service_id: String,
    /// Calendar date, ISO `YYYY-MM-DD`.
    #[schema(example = "2025-03-01")]
    pub date: String,
    /// Slot label, zero-padded `"HH:MM"`.
    #[schema(example = "10:00")]
    pub slot: String,
    /// Client display name; required and non-blank.
    #[schema(example = "Ana")]
    pub client_name: String,
    /// Client phone; part of the dedup key when present.
    pub client_phone: Option<String>,
    /// Client email, stored on newly created clients only.
    pub client_email: Option<String>,
}

/// Booking confirmation for `POST /api/v1/bookings`.
///
/// `awaitingConfirmation` is always `true`: a fresh booking is pending until
/// the model or an administrator confirms it, and the message phrasing keeps
/// clients from reading the response as a final confirmation.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    /// Created appointment id.
    #[schema(value_type = String)]
    pub appointment_id: String,
    /// The client the booking was attached to (existing or fresh).
    #[schema(value_type = String)]
    pub client_id: String,
    /// Price snapshot, decimal string.
    #[schema(example = "200.00")]
    pub price: String,
    /// Duration snapshot in minutes.
    #[schema(example = 60)]
    pub duration_minutes: u32,
    /// Lifecycle status; always `pending` for fresh bookings.
    #[schema(example = "pending")]
    pub status: String,
    /// Ledger-derived payment status; always `pending` for fresh bookings.
    #[schema(example = "pending")]
    pub payment_status: String,
    /// Whether the booking still awaits confirmation.
    #[schema(example = true)]
    pub awaiting_confirmation: bool,
    /// Human-readable summary for display.
    pub message: String,
}

impl From<BookingConfirmation> for BookingResponse {
    fn from(confirmation: BookingConfirmation) -> Self {
        Self {
            appointment_id: confirmation.appointment_id.to_string(),
            client_id: confirmation.client_id.to_string(),
            price: confirmation.price.to_string(),
            duration_minutes: confirmation.duration_minutes,
            status: confirmation.status.to_string(),
            payment_status: confirmation.payment_status.to_string(),
            awaiting_confirmation: confirmation.awaiting_confirmation,
            message: "Booking request received; it is not confirmed yet. You will be \
                      contacted once the appointment is confirmed."
                .to_owned(),
        }
    }
}

fn booking_request(body: BookingBody) -> Result<BookingRequest, Error> {
    let model_id = parse_uuid(&body.model_id, FieldName::new("modelId"))?;
    let service_id = parse_uuid(&body.service_id, FieldName::new("serviceId"))?;
    let date = parse_date(&body.date, FieldName::new("date"))?;
    let slot = parse_slot(&body.slot, FieldName::new("slot"))?;
    Ok(BookingRequest {
        model_id: ModelId::from(model_id),
        service_id: ServiceId::from(service_id),
        date,
        slot,
        client_name: body.client_name,
        client_phone: body.client_phone,
        client_email: body.client_email,
    })
}

/// Book an appointment as the public actor.
#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    request_body = BookingBody,
    responses(
        (status = 201, description = "Booking accepted, awaiting confirmation", body = BookingResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Model or service not found", body = Error),
        (status = 503, description = "Backend unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["bookings"],
    operation_id = "createBooking",
    security([])
)]
#[post("/bookings")]
pub async fn create_booking(
    state: web::Data<HttpState>,
    payload: web::Json<BookingBody>,
) -> ApiResult<HttpResponse> {
    let request = booking_request(payload.into_inner())?;
    let confirmation = state.booking.book(request).await?;
    Ok(HttpResponse::Created().json(BookingResponse::from(confirmation)))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use std::sync::Arc;

    use actix_web::{http::StatusCode, test as actix_test, web, App};
    use chrono::{TimeZone, Utc};
    use mockable::MockClock;
    use serde_json::Value;

    use super::*;
    use crate::domain::ids::{AppointmentId, ClientId};
    use crate::domain::ports::{MockAppointmentDesk, MockBookingFlow, MockPaymentLedger};
    use crate::domain::{AppointmentStatus, AvailabilityService, PaymentStatus};

    fn body() -> BookingBody {
        BookingBody {
            model_id: ModelId::random().to_string(),
            service_id: ServiceId::random().to_string(),
            date: "2025-03-01".to_owned(),
            slot: "10:00".to_owned(),
            client_name: "Ana".to_owned(),
            client_phone: Some("111".to_owned()),
            client_email: None,
        }
    }

    fn confirmation() -> BookingConfirmation {
        BookingConfirmation {
            appointment_id: AppointmentId::random(),
            client_id: ClientId::random(),
            price: "200.00".parse().expect("valid price"),
            duration_minutes: 60,
            status: AppointmentStatus::Pending,
            payment_status: PaymentStatus::Pending,
            awaiting_confirmation: true,
        }
    }

    fn state(booking: MockBookingFlow) -> HttpState {
        let mut clock = MockClock::new();
        clock.expect_utc().return_const(
            Utc.with_ymd_and_hms(2025, 2, 1, 10, 0, 0)
                .single()
                .expect("valid fixed instant"),
        );
        HttpState::new(
            Arc::new(booking),
            Arc::new(MockAppointmentDesk::new()),
            Arc::new(MockPaymentLedger::new()),
            Arc::new(AvailabilityService::new(Arc::new(clock))),
        )
    }

    async fn post_booking(state: HttpState, body: &BookingBody) -> (StatusCode, Value) {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(web::scope("/api/v1").service(create_booking)),
        )
        .await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/bookings")
                .set_json(body)
                .to_request(),
        )
        .await;
        let status = response.status();
        let bytes = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&bytes).expect("JSON body");
        (status, value)
    }

    #[actix_web::test]
    async fn successful_booking_returns_created_and_awaiting_confirmation() {
        let mut booking = MockBookingFlow::new();
        booking
            .expect_book()
            .times(1)
            .return_once(|_| Ok(confirmation()));

        let (status, value) = post_booking(state(booking), &body()).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(value["awaitingConfirmation"], Value::Bool(true));
        assert_eq!(value["status"], "pending");
        assert_eq!(value["paymentStatus"], "pending");
        assert_eq!(value["price"], "200.00");
        let message = value["message"].as_str().expect("message string");
        assert!(message.contains("not confirmed"));
    }

    #[actix_web::test]
    async fn malformed_model_id_fails_before_the_use_case_runs() {
        let mut booking = MockBookingFlow::new();
        booking.expect_book().times(0);

        let mut bad = body();
        bad.model_id = "not-a-uuid".to_owned();
        let (status, value) = post_booking(state(booking), &bad).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["details"]["field"], "modelId");
        assert_eq!(value["details"]["code"], "invalid_uuid");
    }

    #[actix_web::test]
    async fn off_grid_slot_is_rejected_with_slot_details() {
        let mut booking = MockBookingFlow::new();
        booking.expect_book().times(0);

        let mut bad = body();
        bad.slot = "10:15".to_owned();
        let (status, value) = post_booking(state(booking), &bad).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["details"]["field"], "slot");
    }

    #[actix_web::test]
    async fn use_case_failures_surface_with_their_status() {
        let mut booking = MockBookingFlow::new();
        booking
            .expect_book()
            .times(1)
            .return_once(|_| Err(Error::not_found("service offering not found")));

        let (status, value) = post_booking(state(booking), &body()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(value["code"], "not_found");
    }
}
