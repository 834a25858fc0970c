//! Availability API handlers.
//!
//! ```text
//! GET /api/v1/availability?date=2025-03-01
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};

use crate::domain::Error;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_date, FieldName};
use crate::inbound::http::ApiResult;

/// Query string for `GET /api/v1/availability`.
#[derive(Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    /// Calendar date to check, ISO `YYYY-MM-DD`.
    pub date: String,
}

/// Remaining bookable slots for one date.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    /// The date the slots belong to.
    #[schema(example = "2025-03-01")]
    pub date: String,
    /// Zero-padded `"HH:MM"` labels, chronologically ordered. May be empty.
    #[schema(example = json!(["19:30", "20:00"]))]
    pub slots: Vec<String>,
}

/// List the slots a client may still select for a date.
///
/// An empty list is a valid answer for today once the lead time has passed
/// every remaining slot; callers should offer a future date instead.
#[utoipa::path(
    get,
    path = "/api/v1/availability",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Remaining slots", body = AvailabilityResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["availability"],
    operation_id = "listAvailability",
    security([])
)]
#[get("/availability")]
pub async fn list_availability(
    state: web::Data<HttpState>,
    query: web::Query<AvailabilityQuery>,
) -> ApiResult<web::Json<AvailabilityResponse>> {
    let date = parse_date(&query.date, FieldName::new("date"))?;
    let slots = state.availability.available_slots(date)?;
    Ok(web::Json(AvailabilityResponse {
        date: date.to_string(),
        slots: slots.iter().map(ToString::to_string).collect(),
    }))
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
    use crate::domain::ports::{MockAppointmentDesk, MockBookingFlow, MockPaymentLedger};
    use crate::domain::AvailabilityService;

    fn state_at(hour: u32, minute: u32) -> HttpState {
        let mut clock = MockClock::new();
        clock.expect_utc().return_const(
            Utc.with_ymd_and_hms(2025, 3, 1, hour, minute, 0)
                .single()
                .expect("valid fixed instant"),
        );
        HttpState::new(
            Arc::new(MockBookingFlow::new()),
            Arc::new(MockAppointmentDesk::new()),
            Arc::new(MockPaymentLedger::new()),
            Arc::new(AvailabilityService::new(Arc::new(clock))),
        )
    }

    async fn get_availability(state: HttpState, uri: &str) -> (StatusCode, Value) {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(web::scope("/api/v1").service(list_availability)),
        )
        .await;
        let response =
            actix_test::call_service(&app, actix_test::TestRequest::get().uri(uri).to_request())
                .await;
        let status = response.status();
        let body = actix_test::read_body(response).await;
        let value: Value = serde_json::from_slice(&body).expect("JSON body");
        (status, value)
    }

    #[actix_web::test]
    async fn evening_request_returns_only_late_slots() {
        let (status, value) =
            get_availability(state_at(18, 45), "/api/v1/availability?date=2025-03-01").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["slots"], serde_json::json!(["19:30", "20:00"]));
    }

    #[actix_web::test]
    async fn exhausted_day_returns_an_empty_list_not_an_error() {
        let (status, value) =
            get_availability(state_at(19, 45), "/api/v1/availability?date=2025-03-01").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["slots"], serde_json::json!([]));
    }

    #[actix_web::test]
    async fn future_date_returns_the_full_grid() {
        let (status, value) =
            get_availability(state_at(19, 45), "/api/v1/availability?date=2025-03-02").await;
        assert_eq!(status, StatusCode::OK);
        let slots = value["slots"].as_array().expect("slots array");
        assert_eq!(slots.len(), 23);
    }

    #[actix_web::test]
    async fn malformed_date_is_a_bad_request_with_field_details() {
        let (status, value) =
            get_availability(state_at(10, 0), "/api/v1/availability?date=March+1st").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["details"]["field"], "date");
        assert_eq!(value["details"]["code"], "invalid_date");
    }

    #[actix_web::test]
    async fn past_date_is_rejected() {
        let (status, _) =
            get_availability(state_at(10, 0), "/api/v1/availability?date=2025-02-28").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
