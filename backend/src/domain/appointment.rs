//! Appointment records and their lifecycle state machine.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::ids::{AppointmentId, ClientId, ModelId, ServiceId};
use crate::domain::money::Money;
use crate::domain::schedule::Slot;

/// Lifecycle state of an appointment.
///
/// Valid edges: `Pending -> Confirmed -> Completed`, with `Cancelled`
/// reachable from `Pending` or `Confirmed`. `Completed` and `Cancelled` are
/// terminal. Nothing auto-expires a pending appointment; every transition is
/// actor-initiated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    /// Booked but awaiting the model's confirmation.
    Pending,
    /// Confirmed by the model or an administrator.
    Confirmed,
    /// The appointment took place.
    Completed,
    /// Called off before completion.
    Cancelled,
}

impl AppointmentStatus {
    /// Stable wire label for this status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether no further transitions may leave this state.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Whether the state machine permits moving from `self` to `next`.
    #[must_use]
    pub const fn can_transition_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed)
                | (Self::Pending, Self::Cancelled)
                | (Self::Confirmed, Self::Completed)
                | (Self::Confirmed, Self::Cancelled)
        )
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = AppointmentValidationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(AppointmentValidationError::UnknownStatus {
                value: input.to_owned(),
            }),
        }
    }
}

/// Validation errors for appointment records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppointmentValidationError {
    /// Price must be strictly positive for status derivation to make sense.
    #[error("appointment price must be greater than zero")]
    ZeroPrice,
    /// Duration must cover at least one minute.
    #[error("appointment duration must be greater than zero minutes")]
    ZeroDuration,
    /// The status label is not one of the lifecycle states.
    #[error("unknown appointment status {value:?}")]
    UnknownStatus {
        /// The rejected input.
        value: String,
    },
}

/// A booked appointment.
///
/// ## Invariants
/// - `price` and `duration_minutes` are snapshots taken from the service
///   offering at booking time; later price changes never alter this record.
/// - The payment status is not a field here. It is derived from the ledger on
///   every read; see [`crate::domain::derive_payment_status`].
/// - When `created_by_admin` is set, the model actor may neither update nor
///   delete the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    /// Record id.
    pub id: AppointmentId,
    /// The model whose diary this appointment occupies.
    pub model_id: ModelId,
    /// The booked client.
    pub client_id: ClientId,
    /// The service offering this booking was made against.
    pub service_id: ServiceId,
    /// Calendar date of the appointment.
    pub date: NaiveDate,
    /// Half-hour slot the appointment starts in.
    pub slot: Slot,
    /// Snapshot of the service duration at booking time.
    pub duration_minutes: u32,
    /// Snapshot of the service price at booking time.
    pub price: Money,
    /// Lifecycle state.
    pub status: AppointmentStatus,
    /// Where the appointment takes place.
    pub location: Option<String>,
    /// Free-form notes.
    pub observations: Option<String>,
    /// Whether an administrator created this record directly.
    pub created_by_admin: bool,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
}

/// Fields required to create an appointment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentDraft {
    /// The model whose diary this appointment occupies.
    pub model_id: ModelId,
    /// The booked client.
    pub client_id: ClientId,
    /// The service offering this booking was made against.
    pub service_id: ServiceId,
    /// Calendar date of the appointment.
    pub date: NaiveDate,
    /// Half-hour slot the appointment starts in.
    pub slot: Slot,
    /// Snapshot of the service duration at booking time.
    pub duration_minutes: u32,
    /// Snapshot of the service price at booking time.
    pub price: Money,
    /// Where the appointment takes place.
    pub location: Option<String>,
    /// Free-form notes.
    pub observations: Option<String>,
    /// Whether an administrator created this record directly.
    pub created_by_admin: bool,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
}

impl Appointment {
    /// Validate a draft into a new `Pending` appointment with a fresh id.
    pub fn new(draft: AppointmentDraft) -> Result<Self, AppointmentValidationError> {
        if draft.price.is_zero() {
            return Err(AppointmentValidationError::ZeroPrice);
        }
        if draft.duration_minutes == 0 {
            return Err(AppointmentValidationError::ZeroDuration);
        }
        Ok(Self {
            id: AppointmentId::random(),
            model_id: draft.model_id,
            client_id: draft.client_id,
            service_id: draft.service_id,
            date: draft.date,
            slot: draft.slot,
            duration_minutes: draft.duration_minutes,
            price: draft.price,
            status: AppointmentStatus::Pending,
            location: draft.location,
            observations: draft.observations,
            created_by_admin: draft.created_by_admin,
            created_at: draft.created_at,
        })
    }
}

/// Partial update applied to an appointment's editable details.
///
/// Absent fields are left untouched; the lifecycle status is never part of a
/// details update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppointmentChanges {
    /// Move the appointment to another calendar date.
    pub date: Option<NaiveDate>,
    /// Move the appointment to another slot.
    pub slot: Option<Slot>,
    /// Replace the location.
    pub location: Option<String>,
    /// Replace the notes.
    pub observations: Option<String>,
}

impl AppointmentChanges {
    /// Whether the update carries no changes at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.slot.is_none()
            && self.location.is_none()
            && self.observations.is_none()
    }

    /// Apply the changes to a record.
    pub fn apply_to(&self, appointment: &mut Appointment) {
        if let Some(date) = self.date {
            appointment.date = date;
        }
        if let Some(slot) = self.slot {
            appointment.slot = slot;
        }
        if let Some(location) = &self.location {
            appointment.location = Some(location.clone());
        }
        if let Some(observations) = &self.observations {
            appointment.observations = Some(observations.clone());
        }
    }
}
