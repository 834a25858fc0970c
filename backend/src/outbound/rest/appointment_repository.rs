//! Hosted-data-API adapter for the appointment repository port.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{json, Map, Value};

use super::rows::AppointmentRow;
use super::transport::{RestTransport, TransportError};
use crate::domain::appointment::{Appointment, AppointmentChanges, AppointmentStatus};
use crate::domain::ids::{AppointmentId, ModelId};
use crate::domain::ports::{AppointmentRepository, AppointmentRepositoryError};

const TABLE: &str = "appointments";

fn map_transport_error(error: TransportError) -> AppointmentRepositoryError {
    match error {
        TransportError::Connection { message } => {
            AppointmentRepositoryError::connection(message)
        }
        other => AppointmentRepositoryError::query(other.to_string()),
    }
}

/// Appointment repository backed by the `appointments` table.
#[derive(Debug, Clone)]
pub struct RestAppointmentRepository {
    transport: RestTransport,
}

impl RestAppointmentRepository {
    /// Build an adapter over a shared transport.
    #[must_use]
    pub fn new(transport: RestTransport) -> Self {
        Self { transport }
    }
}

fn details_patch(changes: &AppointmentChanges) -> Value {
    let mut patch = Map::new();
    if let Some(date) = changes.date {
        patch.insert("date".to_owned(), json!(date));
    }
    if let Some(slot) = changes.slot {
        patch.insert("slot".to_owned(), json!(slot.label()));
    }
    if let Some(location) = &changes.location {
        patch.insert("location".to_owned(), json!(location));
    }
    if let Some(observations) = &changes.observations {
        patch.insert("observations".to_owned(), json!(observations));
    }
    Value::Object(patch)
}

#[async_trait]
impl AppointmentRepository for RestAppointmentRepository {
    async fn insert(&self, appointment: &Appointment) -> Result<(), AppointmentRepositoryError> {
        self.transport
            .insert(TABLE, &AppointmentRow::from(appointment))
            .await
            .map_err(map_transport_error)
    }

    async fn find_by_id(
        &self,
        id: &AppointmentId,
    ) -> Result<Option<Appointment>, AppointmentRepositoryError> {
        let rows: Vec<AppointmentRow> = self
            .transport
            .select(TABLE, &[("id", format!("eq.{id}"))])
            .await
            .map_err(map_transport_error)?;
        rows.into_iter()
            .next()
            .map(Appointment::try_from)
            .transpose()
            .map_err(|error| AppointmentRepositoryError::query(error.to_string()))
    }

    async fn list_for_model_on_day(
        &self,
        model_id: &ModelId,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, AppointmentRepositoryError> {
        let rows: Vec<AppointmentRow> = self
            .transport
            .select(
                TABLE,
                &[
                    ("model_id", format!("eq.{model_id}")),
                    ("date", format!("eq.{date}")),
                    ("order", "slot.asc".to_owned()),
                ],
            )
            .await
            .map_err(map_transport_error)?;
        rows.into_iter()
            .map(Appointment::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|error| AppointmentRepositoryError::query(error.to_string()))
    }

    async fn update_status(
        &self,
        id: &AppointmentId,
        status: AppointmentStatus,
    ) -> Result<(), AppointmentRepositoryError> {
        let touched = self
            .transport
            .update(
                TABLE,
                &[("id", format!("eq.{id}"))],
                &json!({ "status": status.as_str() }),
            )
            .await
            .map_err(map_transport_error)?;
        if touched == 0 {
            return Err(AppointmentRepositoryError::NotFound { id: *id });
        }
        Ok(())
    }

    async fn update_details(
        &self,
        id: &AppointmentId,
        changes: &AppointmentChanges,
    ) -> Result<(), AppointmentRepositoryError> {
        let touched = self
            .transport
            .update(TABLE, &[("id", format!("eq.{id}"))], &details_patch(changes))
            .await
            .map_err(map_transport_error)?;
        if touched == 0 {
            return Err(AppointmentRepositoryError::NotFound { id: *id });
        }
        Ok(())
    }

    async fn delete(&self, id: &AppointmentId) -> Result<(), AppointmentRepositoryError> {
        let removed = self
            .transport
            .delete(TABLE, &[("id", format!("eq.{id}"))])
            .await
            .map_err(map_transport_error)?;
        if removed == 0 {
            return Err(AppointmentRepositoryError::NotFound { id: *id });
        }
        Ok(())
    }
}
