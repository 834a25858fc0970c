//! Payment ledger API handlers.
//!
//! ```text
//! POST   /api/v1/appointments/{id}/payments
//!   {"amount":"50.00","paymentDate":"2025-03-01","method":"pix"}
//! GET    /api/v1/appointments/{id}/payments
//! DELETE /api/v1/payments/{id}
//! ```
//!
//! Every mutation responds with the ledger summary recomputed from a fresh
//! read, so the caller always sees the derived payment status it produced.

use actix_web::{delete, get, post, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::ids::{AppointmentId, PaymentId};
use crate::domain::ports::LedgerSummary;
use crate::domain::{Error, Payment, PaymentDraft, PaymentMethod};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    invalid_status_error, parse_date, parse_money, parse_uuid, FieldName,
};
use crate::inbound::http::ApiResult;

/// Ledger entry payload.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDto {
    /// Ledger entry id.
    #[schema(value_type = String)]
    pub id: String,
    /// The appointment the entry settles against.
    #[schema(value_type = String)]
    pub appointment_id: String,
    /// Amount, decimal string.
    #[schema(example = "50.00")]
    pub amount: String,
    /// Calendar date the payment was made.
    #[schema(value_type = String, example = "2025-03-01")]
    pub payment_date: NaiveDate,
    /// Settlement method.
    #[schema(example = "pix")]
    pub method: String,
    /// Free-form operator notes.
    pub notes: Option<String>,
}

impl From<Payment> for PaymentDto {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id.to_string(),
            appointment_id: payment.appointment_id.to_string(),
            amount: payment.amount.to_string(),
            payment_date: payment.payment_date,
            method: payment.method.to_string(),
            notes: payment.notes,
        }
    }
}

/// Full ledger of one appointment plus its derived totals.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LedgerDto {
    /// The appointment the ledger belongs to.
    #[schema(value_type = String)]
    pub appointment_id: String,
    /// Entries ordered by payment date.
    pub entries: Vec<PaymentDto>,
    /// Sum of all entries, decimal string.
    #[schema(example = "150.00")]
    pub total_paid: String,
    /// Status derived from the sum versus the appointment price.
    #[schema(example = "partial")]
    pub payment_status: String,
}

impl From<LedgerSummary> for LedgerDto {
    fn from(summary: LedgerSummary) -> Self {
        Self {
            appointment_id: summary.appointment_id.to_string(),
            entries: summary.entries.into_iter().map(PaymentDto::from).collect(),
            total_paid: summary.total_paid.to_string(),
            payment_status: summary.payment_status.to_string(),
        }
    }
}

/// Body for `POST /api/v1/appointments/{id}/payments`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentBody {
    /// Strictly positive amount, decimal string.
    #[schema(example = "50.00")]
    pub amount: String,
    /// Calendar date the payment was made, ISO `YYYY-MM-DD`.
    #[schema(example = "2025-03-01")]
    pub payment_date: String,
    /// One of `pix`, `cash`, `card`, `transfer`, `other`.
    #[schema(example = "pix")]
    pub method: String,
    /// Free-form operator notes.
    pub notes: Option<String>,
}

fn payment_draft(appointment_id: AppointmentId, body: PaymentBody) -> Result<PaymentDraft, Error> {
    let amount = parse_money(&body.amount, FieldName::new("amount"))?;
    let payment_date = parse_date(&body.payment_date, FieldName::new("paymentDate"))?;
    let method: PaymentMethod = body
        .method
        .parse()
        .map_err(|_| invalid_status_error(FieldName::new("method"), &body.method))?;
    Ok(PaymentDraft {
        appointment_id,
        amount,
        payment_date,
        method,
        notes: body.notes,
    })
}

/// Append a payment to an appointment's ledger.
#[utoipa::path(
    post,
    path = "/api/v1/appointments/{id}/payments",
    params(("id" = String, Path, description = "Appointment id")),
    request_body = PaymentBody,
    responses(
        (status = 201, description = "Recomputed ledger summary", body = LedgerDto),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["payments"],
    operation_id = "recordPayment"
)]
#[post("/appointments/{id}/payments")]
pub async fn record_payment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<PaymentBody>,
) -> ApiResult<actix_web::HttpResponse> {
    let actor = session.actor()?;
    let appointment_id =
        AppointmentId::from(parse_uuid(&path, FieldName::new("id"))?);
    let draft = payment_draft(appointment_id, payload.into_inner())?;
    let summary = state.payments.record(&actor, draft).await?;
    Ok(actix_web::HttpResponse::Created().json(LedgerDto::from(summary)))
}

/// Read an appointment's ledger and derived totals.
#[utoipa::path(
    get,
    path = "/api/v1/appointments/{id}/payments",
    params(("id" = String, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Current ledger summary", body = LedgerDto),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["payments"],
    operation_id = "getLedger"
)]
#[get("/appointments/{id}/payments")]
pub async fn get_ledger(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<LedgerDto>> {
    let actor = session.actor()?;
    let appointment_id =
        AppointmentId::from(parse_uuid(&path, FieldName::new("id"))?);
    let summary = state.payments.ledger(&actor, &appointment_id).await?;
    Ok(web::Json(LedgerDto::from(summary)))
}

/// Void a ledger entry.
#[utoipa::path(
    delete,
    path = "/api/v1/payments/{id}",
    params(("id" = String, Path, description = "Payment id")),
    responses(
        (status = 200, description = "Recomputed ledger summary", body = LedgerDto),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["payments"],
    operation_id = "voidPayment"
)]
#[delete("/payments/{id}")]
pub async fn void_payment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<LedgerDto>> {
    let actor = session.actor()?;
    let payment_id = PaymentId::from(parse_uuid(&path, FieldName::new("id"))?);
    let summary = state.payments.void(&actor, &payment_id).await?;
    Ok(web::Json(LedgerDto::from(summary)))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use std::sync::Arc;

    use actix_web::{http::StatusCode, test as actix_test, web, App, HttpResponse as Resp};
    use chrono::{TimeZone, Utc};
    use mockable::MockClock;
    use serde_json::Value;

    use crate::domain::ids::ModelId;
    use crate::domain::ports::{MockAppointmentDesk, MockBookingFlow, MockPaymentLedger};
    use crate::domain::{AvailabilityService, Money, PaymentStatus};

    use super::*;

    fn money(raw: &str) -> Money {
        raw.parse().expect("valid test amount")
    }

    fn summary(appointment_id: AppointmentId) -> LedgerSummary {
        let entry = Payment::new(PaymentDraft {
            appointment_id,
            amount: money("50.00"),
            payment_date: "2025-03-01".parse().expect("valid date"),
            method: PaymentMethod::Pix,
            notes: None,
        })
        .expect("valid entry");
        LedgerSummary {
            appointment_id,
            entries: vec![entry],
            total_paid: money("50.00"),
            payment_status: PaymentStatus::Partial,
        }
    }

    fn state(ledger: MockPaymentLedger) -> HttpState {
        let mut clock = MockClock::new();
        clock.expect_utc().return_const(
            Utc.with_ymd_and_hms(2025, 2, 1, 10, 0, 0)
                .single()
                .expect("valid fixed instant"),
        );
        HttpState::new(
            Arc::new(MockBookingFlow::new()),
            Arc::new(MockAppointmentDesk::new()),
            Arc::new(ledger),
            Arc::new(AvailabilityService::new(Arc::new(clock))),
        )
    }

    async fn app_with_model_session(
        state: HttpState,
        model_id: ModelId,
    ) -> (
        impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
        >,
        actix_web::cookie::Cookie<'static>,
    ) {
        let app = actix_test::init_service(
            App::new()
                .wrap(crate::inbound::http::test_utils::test_session_middleware())
                .app_data(web::Data::new(state))
                .route(
                    "/test-login",
                    web::get().to(move |session: SessionContext| async move {
                        session.persist_model(&model_id)?;
                        Ok::<_, Error>(Resp::Ok())
                    }),
                )
                .service(
                    web::scope("/api/v1")
                        .service(record_payment)
                        .service(get_ledger)
                        .service(void_payment),
                ),
        )
        .await;

        let login = actix_test::call_service(
            &app,
            actix_test::TestRequest::get().uri("/test-login").to_request(),
        )
        .await;
        let cookie = login
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie")
            .into_owned();
        (app, cookie)
    }

    fn body() -> PaymentBody {
        PaymentBody {
            amount: "50.00".to_owned(),
            payment_date: "2025-03-01".to_owned(),
            method: "pix".to_owned(),
            notes: None,
        }
    }

    #[actix_web::test]
    async fn recording_returns_the_recomputed_summary() {
        let appointment_id = AppointmentId::random();
        let expected = summary(appointment_id);

        let mut ledger = MockPaymentLedger::new();
        ledger
            .expect_record()
            .times(1)
            .withf(move |_, draft| {
                draft.appointment_id == appointment_id && draft.amount == money("50.00")
            })
            .return_once(move |_, _| Ok(expected));

        let (app, cookie) = app_with_model_session(state(ledger), ModelId::random()).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!("/api/v1/appointments/{appointment_id}/payments"))
                .cookie(cookie)
                .set_json(body())
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let value: Value =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("JSON body");
        assert_eq!(value["totalPaid"], "50.00");
        assert_eq!(value["paymentStatus"], "partial");
        assert_eq!(value["entries"].as_array().map(Vec::len), Some(1));
    }

    #[actix_web::test]
    async fn unknown_method_fails_before_the_ledger_runs() {
        let mut ledger = MockPaymentLedger::new();
        ledger.expect_record().times(0);

        let mut bad = body();
        bad.method = "cheque".to_owned();
        let (app, cookie) = app_with_model_session(state(ledger), ModelId::random()).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!(
                    "/api/v1/appointments/{}/payments",
                    AppointmentId::random()
                ))
                .cookie(cookie)
                .set_json(bad)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let value: Value =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("JSON body");
        assert_eq!(value["details"]["field"], "method");
    }

    #[actix_web::test]
    async fn negative_amount_is_rejected_with_amount_details() {
        let mut ledger = MockPaymentLedger::new();
        ledger.expect_record().times(0);

        let mut bad = body();
        bad.amount = "-10.00".to_owned();
        let (app, cookie) = app_with_model_session(state(ledger), ModelId::random()).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri(&format!(
                    "/api/v1/appointments/{}/payments",
                    AppointmentId::random()
                ))
                .cookie(cookie)
                .set_json(bad)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let value: Value =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("JSON body");
        assert_eq!(value["details"]["code"], "invalid_amount");
    }

    #[actix_web::test]
    async fn ledger_read_serialises_entries_and_totals() {
        let appointment_id = AppointmentId::random();
        let expected = summary(appointment_id);

        let mut ledger = MockPaymentLedger::new();
        ledger
            .expect_ledger()
            .times(1)
            .return_once(move |_, _| Ok(expected));

        let (app, cookie) = app_with_model_session(state(ledger), ModelId::random()).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/api/v1/appointments/{appointment_id}/payments"))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let value: Value =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("JSON body");
        assert_eq!(value["appointmentId"], appointment_id.to_string());
        assert_eq!(value["entries"][0]["method"], "pix");
        assert_eq!(value["entries"][0]["amount"], "50.00");
    }

    #[actix_web::test]
    async fn voiding_a_missing_entry_is_not_found() {
        let mut ledger = MockPaymentLedger::new();
        ledger
            .expect_void()
            .times(1)
            .return_once(|_, _| Err(Error::not_found("payment not found")));

        let (app, cookie) = app_with_model_session(state(ledger), ModelId::random()).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::delete()
                .uri(&format!("/api/v1/payments/{}", PaymentId::random()))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn anonymous_requests_reach_the_ledger_as_the_public_actor() {
        let mut ledger = MockPaymentLedger::new();
        ledger
            .expect_ledger()
            .times(1)
            .withf(|actor, _| actor.is_public())
            .return_once(|_, _| Err(Error::unauthorized("authentication required")));

        let app = actix_test::init_service(
            App::new()
                .wrap(crate::inbound::http::test_utils::test_session_middleware())
                .app_data(web::Data::new(state(ledger)))
                .service(web::scope("/api/v1").service(get_ledger)),
        )
        .await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!(
                    "/api/v1/appointments/{}/payments",
                    AppointmentId::random()
                ))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
