//! Driving port for appointment lifecycle management.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::actor::Actor;
use crate::domain::appointment::{Appointment, AppointmentChanges, AppointmentStatus};
use crate::domain::error::Error;
use crate::domain::ids::{AppointmentId, ModelId};
use crate::domain::money::Money;
use crate::domain::payment::PaymentStatus;

/// An appointment together with its derived ledger state.
///
/// The payment status is recomputed from the full ledger on every read; no
/// stored status field is ever trusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppointmentView {
    /// The stored record.
    pub appointment: Appointment,
    /// Sum of the ledger at read time.
    pub total_paid: Money,
    /// Status derived from `total_paid` versus the price.
    pub payment_status: PaymentStatus,
}

/// Driving port: reads and actor-initiated mutations of appointments.
///
/// Every operation takes the acting identity explicitly. The public actor is
/// rejected outright; a model actor is confined to its own diary and blocked
/// from records flagged `created_by_admin` (the flag is re-read from the
/// store at mutation time, never trusted from a caller-held copy).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppointmentDesk: Send + Sync {
    /// Read one appointment with its derived payment status.
    async fn get(&self, actor: &Actor, id: &AppointmentId) -> Result<AppointmentView, Error>;

    /// Read a model's diary for one day, ordered by slot.
    async fn list_for_day(
        &self,
        actor: &Actor,
        model_id: &ModelId,
        date: NaiveDate,
    ) -> Result<Vec<AppointmentView>, Error>;

    /// Move an appointment along the lifecycle state machine.
    async fn transition(
        &self,
        actor: &Actor,
        id: &AppointmentId,
        next: AppointmentStatus,
    ) -> Result<AppointmentView, Error>;

    /// Apply a partial details update.
    async fn update_details(
        &self,
        actor: &Actor,
        id: &AppointmentId,
        changes: AppointmentChanges,
    ) -> Result<AppointmentView, Error>;

    /// Delete an appointment.
    async fn delete(&self, actor: &Actor, id: &AppointmentId) -> Result<(), Error>;
}
