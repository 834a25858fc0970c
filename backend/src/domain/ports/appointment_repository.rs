//! Port for appointment persistence.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::appointment::{Appointment, AppointmentChanges, AppointmentStatus};
use crate::domain::ids::{AppointmentId, ModelId};

/// Errors raised by appointment repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppointmentRepositoryError {
    /// The backend could not be reached.
    #[error("appointment store unreachable: {message}")]
    Connection {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// A query or mutation failed during execution.
    #[error("appointment store query failed: {message}")]
    Query {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// A mutation targeted a record that does not exist.
    #[error("appointment {id} not found")]
    NotFound {
        /// The missing record id.
        id: AppointmentId,
    },
}

impl AppointmentRepositoryError {
    /// Connection-failure constructor.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Query-failure constructor.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for reading and mutating appointment records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    /// Persist a new appointment.
    async fn insert(&self, appointment: &Appointment) -> Result<(), AppointmentRepositoryError>;

    /// Find an appointment by id.
    async fn find_by_id(
        &self,
        id: &AppointmentId,
    ) -> Result<Option<Appointment>, AppointmentRepositoryError>;

    /// All appointments in a model's diary on a given day, ordered by slot.
    async fn list_for_model_on_day(
        &self,
        model_id: &ModelId,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, AppointmentRepositoryError>;

    /// Replace the lifecycle status of a record.
    async fn update_status(
        &self,
        id: &AppointmentId,
        status: AppointmentStatus,
    ) -> Result<(), AppointmentRepositoryError>;

    /// Apply a partial details update to a record.
    async fn update_details(
        &self,
        id: &AppointmentId,
        changes: &AppointmentChanges,
    ) -> Result<(), AppointmentRepositoryError>;

    /// Remove a record.
    async fn delete(&self, id: &AppointmentId) -> Result<(), AppointmentRepositoryError>;
}

/// Fixture implementation for tests that do not exercise appointments.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAppointmentRepository;

#[async_trait]
impl AppointmentRepository for FixtureAppointmentRepository {
    async fn insert(&self, _appointment: &Appointment) -> Result<(), AppointmentRepositoryError> {
        Ok(())
    }

    async fn find_by_id(
        &self,
        _id: &AppointmentId,
    ) -> Result<Option<Appointment>, AppointmentRepositoryError> {
        Ok(None)
    }

    async fn list_for_model_on_day(
        &self,
        _model_id: &ModelId,
        _date: NaiveDate,
    ) -> Result<Vec<Appointment>, AppointmentRepositoryError> {
        Ok(Vec::new())
    }

    async fn update_status(
        &self,
        id: &AppointmentId,
        _status: AppointmentStatus,
    ) -> Result<(), AppointmentRepositoryError> {
        Err(AppointmentRepositoryError::NotFound { id: *id })
    }

    async fn update_details(
        &self,
        id: &AppointmentId,
        _changes: &AppointmentChanges,
    ) -> Result<(), AppointmentRepositoryError> {
        Err(AppointmentRepositoryError::NotFound { id: *id })
    }

    async fn delete(&self, id: &AppointmentId) -> Result<(), AppointmentRepositoryError> {
        Err(AppointmentRepositoryError::NotFound { id: *id })
    }
}
