//! Appointment API handlers.
//!
//! ```text
//! GET    /api/v1/appointments/{id}
//! GET    /api/v1/appointments?modelId=...&date=2025-03-01
//! PATCH  /api/v1/appointments/{id}/status {"status":"confirmed"}
//! PATCH  /api/v1/appointments/{id}        {"location":"studio"}
//! DELETE /api/v1/appointments/{id}
//! ```
//!
//! All routes resolve the acting identity from the session; the public actor
//! is rejected by the domain service, not here.

use actix_web::{delete, get, patch, web, HttpResponse};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ids::{AppointmentId, ModelId};
use crate::domain::ports::AppointmentView;
use crate::domain::{AppointmentChanges, AppointmentStatus, Error};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    invalid_status_error, missing_field_error, parse_date, parse_slot, parse_uuid, FieldName,
};
use crate::inbound::http::ApiResult;

/// Appointment payload returned by every read and mutation.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDto {
    /// Record id.
    #[schema(value_type = String)]
    pub id: String,
    /// The model whose diary the appointment occupies.
    #[schema(value_type = String)]
    pub model_id: String,
    /// The booked client.
    #[schema(value_type = String)]
    pub client_id: String,
    /// The offering the booking was made against.
    #[schema(value_type = String)]
    pub service_id: String,
    /// Calendar date.
    #[schema(value_type = String, example = "2025-03-01")]
    pub date: NaiveDate,
    /// Slot label.
    #[schema(example = "10:00")]
    pub slot: String,
    /// Duration snapshot in minutes.
    pub duration_minutes: u32,
    /// Price snapshot, decimal string.
    #[schema(example = "200.00")]
    pub price: String,
    /// Lifecycle status.
    #[schema(example = "pending")]
    pub status: String,
    /// Where the appointment takes place.
    pub location: Option<String>,
    /// Free-form notes.
    pub observations: Option<String>,
    /// Whether an administrator created the record.
    pub created_by_admin: bool,
    /// Creation instant.
    #[schema(value_type = String)]
    pub created_at: DateTime<Utc>,
    /// Ledger sum at read time, decimal string.
    #[schema(example = "100.00")]
    pub total_paid: String,
    /// Status derived from the ledger at read time.
    #[schema(example = "partial")]
    pub payment_status: String,
}

impl From<AppointmentView> for AppointmentDto {
    fn from(view: AppointmentView) -> Self {
        let appointment = view.appointment;
        Self {
            id: appointment.id.to_string(),
            model_id: appointment.model_id.to_string(),
            client_id: appointment.client_id.to_string(),
            service_id: appointment.service_id.to_string(),
            date: appointment.date,
            slot: appointment.slot.label(),
            duration_minutes: appointment.duration_minutes,
            price: appointment.price.to_string(),
            status: appointment.status.to_string(),
            location: appointment.location,
            observations: appointment.observations,
            created_by_admin: appointment.created_by_admin,
            created_at: appointment.created_at,
            total_paid: view.total_paid.to_string(),
            payment_status: view.payment_status.to_string(),
        }
    }
}

fn appointment_id(raw: &str) -> Result<AppointmentId, Error> {
    parse_uuid(raw, FieldName::new("id")).map(AppointmentId::from)
}

/// Read one appointment with its derived payment status.
#[utoipa::path(
    get,
    path = "/api/v1/appointments/{id}",
    params(("id" = String, Path, description = "Appointment id")),
    responses(
        (status = 200, description = "Appointment", body = AppointmentDto),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["appointments"],
    operation_id = "getAppointment"
)]
#[get("/appointments/{id}")]
pub async fn get_appointment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<AppointmentDto>> {
    let actor = session.actor()?;
    let id = appointment_id(&path)?;
    let view = state.appointments.get(&actor, &id).await?;
    Ok(web::Json(AppointmentDto::from(view)))
}

/// Query string for the day listing.
#[derive(Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct DayQuery {
    /// Model whose diary to list.
    pub model_id: Option<String>,
    /// Calendar date, ISO `YYYY-MM-DD`.
    pub date: Option<String>,
}

/// List a model's diary for one day, ordered by slot.
#[utoipa::path(
    get,
    path = "/api/v1/appointments",
    params(DayQuery),
    responses(
        (status = 200, description = "Appointments for the day", body = [AppointmentDto]),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["appointments"],
    operation_id = "listAppointments"
)]
#[get("/appointments")]
pub async fn list_appointments(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<DayQuery>,
) -> ApiResult<web::Json<Vec<AppointmentDto>>> {
    let actor = session.actor()?;
    let raw_model = query
        .model_id
        .as_deref()
        .ok_or_else(|| missing_field_error(FieldName::new("modelId")))?;
    let raw_date = query
        .date
        .as_deref()
        .ok_or_else(|| missing_field_error(FieldName::new("date")))?;
    let model_id = ModelId::from(parse_uuid(raw_model, FieldName::new("modelId"))?);
    let date = parse_date(raw_date, FieldName::new("date"))?;

    let views = state
        .appointments
        .list_for_day(&actor, &model_id, date)
        .await?;
    Ok(web::Json(views.into_iter().map(AppointmentDto::from).collect()))
}

/// Status change body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct StatusBody {
    /// Target lifecycle status.
    #[schema(example = "confirmed")]
    pub status: String,
}

/// Move an appointment along the lifecycle state machine.
#[utoipa::path(
    patch,
    path = "/api/v1/appointments/{id}/status",
    params(("id" = String, Path, description = "Appointment id")),
    request_body = StatusBody,
    responses(
        (status = 200, description = "Updated appointment", body = AppointmentDto),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Illegal lifecycle transition", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["appointments"],
    operation_id = "transitionAppointment"
)]
#[patch("/appointments/{id}/status")]
pub async fn transition_appointment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<StatusBody>,
) -> ApiResult<web::Json<AppointmentDto>> {
    let actor = session.actor()?;
    let id = appointment_id(&path)?;
    let next: AppointmentStatus = payload
        .status
        .parse()
        .map_err(|_| invalid_status_error(FieldName::new("status"), &payload.status))?;
    let view = state.appointments.transition(&actor, &id, next).await?;
    Ok(web::Json(AppointmentDto::from(view)))
}

/// Partial details update body; absent fields are left untouched.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DetailsBody {
    /// Move to another calendar date.
    pub date: Option<String>,
    /// Move to another slot.
    pub slot: Option<String>,
    /// Replace the location.
    pub location: Option<String>,
    /// Replace the notes.
    pub observations: Option<String>,
}

impl DetailsBody {
    fn into_changes(self) -> Result<AppointmentChanges, Error> {
        let date = self
            .date
            .as_deref()
            .map(|raw| parse_date(raw, FieldName::new("date")))
            .transpose()?;
        let slot = self
            .slot
            .as_deref()
            .map(|raw| parse_slot(raw, FieldName::new("slot")))
            .transpose()?;
        Ok(AppointmentChanges {
            date,
            slot,
            location: self.location,
            observations: self.observations,
        })
    }
}

/// Apply a partial details update to an appointment.
#[utoipa::path(
    patch,
    path = "/api/v1/appointments/{id}",
    params(("id" = String, Path, description = "Appointment id")),
    request_body = DetailsBody,
    responses(
        (status = 200, description = "Updated appointment", body = AppointmentDto),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["appointments"],
    operation_id = "updateAppointment"
)]
#[patch("/appointments/{id}")]
pub async fn update_appointment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<DetailsBody>,
) -> ApiResult<web::Json<AppointmentDto>> {
    let actor = session.actor()?;
    let id = appointment_id(&path)?;
    let changes = payload.into_inner().into_changes()?;
    let view = state.appointments.update_details(&actor, &id, changes).await?;
    Ok(web::Json(AppointmentDto::from(view)))
}

/// Delete an appointment.
#[utoipa::path(
    delete,
    path = "/api/v1/appointments/{id}",
    params(("id" = String, Path, description = "Appointment id")),
    responses(
        (status = 204, description = "Appointment removed"),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["appointments"],
    operation_id = "deleteAppointment"
)]
#[delete("/appointments/{id}")]
pub async fn delete_appointment(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let actor = session.actor()?;
    let id = appointment_id(&path)?;
    state.appointments.delete(&actor, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}
