//! Appointment lifecycle service.
//!
//! Implements the [`AppointmentDesk`] driving port: derived-status reads and
//! actor-initiated mutations. The admin-created guard re-reads the record at
//! mutation time so a stale caller-held copy can never bypass it.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::actor::Actor;
use crate::domain::appointment::{Appointment, AppointmentChanges, AppointmentStatus};
use crate::domain::error::Error;
use crate::domain::ids::{AppointmentId, ModelId};
use crate::domain::money::Money;
use crate::domain::payment::derive_payment_status;
use crate::domain::ports::{
    AppointmentDesk, AppointmentRepository, AppointmentRepositoryError, AppointmentView,
    PaymentRepository, PaymentRepositoryError,
};

fn map_appointment_error(error: AppointmentRepositoryError) -> Error {
    match error {
        AppointmentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("appointment store unavailable: {message}"))
        }
        AppointmentRepositoryError::Query { message } => {
            Error::internal(format!("appointment store error: {message}"))
        }
        AppointmentRepositoryError::NotFound { id } => {
            Error::not_found(format!("appointment {id} not found"))
        }
    }
}

fn map_payment_error(error: PaymentRepositoryError) -> Error {
    match error {
        PaymentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("payment ledger unavailable: {message}"))
        }
        PaymentRepositoryError::Query { message } => {
            Error::internal(format!("payment ledger error: {message}"))
        }
        PaymentRepositoryError::NotFound { id } => {
            Error::not_found(format!("payment {id} not found"))
        }
    }
}

/// Reject reads by the public actor and model reads of other diaries.
fn authorize_read(actor: &Actor, model_id: &ModelId) -> Result<(), Error> {
    match actor {
        Actor::Admin(_) => Ok(()),
        Actor::Model(own) if own == model_id => Ok(()),
        Actor::Model(_) => Err(Error::forbidden(
            "appointments of another model are not accessible",
        )),
        Actor::Public => Err(Error::unauthorized("authentication required")),
    }
}

/// Mutation authority: like reads, plus the admin-created guard for models.
fn authorize_mutation(actor: &Actor, appointment: &Appointment) -> Result<(), Error> {
    authorize_read(actor, &appointment.model_id)?;
    if appointment.created_by_admin && !actor.is_admin() {
        return Err(Error::forbidden(
            "appointment is managed by the administrator and cannot be changed here",
        ));
    }
    Ok(())
}

/// Lifecycle service over the appointment store and payment ledger.
#[derive(Clone)]
pub struct AppointmentService<A, P> {
    appointments: Arc<A>,
    payments: Arc<P>,
}

impl<A, P> AppointmentService<A, P> {
    /// Create a lifecycle service over the given adapters.
    pub fn new(appointments: Arc<A>, payments: Arc<P>) -> Self {
        Self {
            appointments,
            payments,
        }
    }
}

impl<A, P> AppointmentService<A, P>
where
    A: AppointmentRepository,
    P: PaymentRepository,
{
    async fn load(&self, id: &AppointmentId) -> Result<Appointment, Error> {
        self.appointments
            .find_by_id(id)
            .await
            .map_err(map_appointment_error)?
            .ok_or_else(|| Error::not_found(format!("appointment {id} not found")))
    }

    /// Authoritative pre-mutation read: fresh record plus authority checks.
    async fn load_for_mutation(
        &self,
        actor: &Actor,
        id: &AppointmentId,
    ) -> Result<Appointment, Error> {
        let appointment = self.load(id).await?;
        authorize_mutation(actor, &appointment)?;
        Ok(appointment)
    }

    /// Attach the ledger-derived payment status to a record.
    async fn with_derived_status(&self, appointment: Appointment) -> Result<AppointmentView, Error> {
        let amounts = self
            .payments
            .amounts_for_appointment(&appointment.id)
            .await
            .map_err(map_payment_error)?;
        let total_paid = Money::sum(amounts.iter().copied())
            .map_err(|err| Error::internal(format!("ledger sum failed: {err}")))?;
        let payment_status = derive_payment_status(appointment.price, amounts)
            .map_err(|err| Error::internal(format!("ledger sum failed: {err}")))?;
        Ok(AppointmentView {
            appointment,
            total_paid,
            payment_status,
        })
    }
}

#[async_trait]
impl<A, P> AppointmentDesk for AppointmentService<A, P>
where
    A: AppointmentRepository,
    P: PaymentRepository,
{
    async fn get(&self, actor: &Actor, id: &AppointmentId) -> Result<AppointmentView, Error> {
        let appointment = self.load(id).await?;
        authorize_read(actor, &appointment.model_id)?;
        self.with_derived_status(appointment).await
    }

    async fn list_for_day(
        &self,
        actor: &Actor,
        model_id: &ModelId,
        date: NaiveDate,
    ) -> Result<Vec<AppointmentView>, Error> {
        authorize_read(actor, model_id)?;
        let appointments = self
            .appointments
            .list_for_model_on_day(model_id, date)
            .await
            .map_err(map_appointment_error)?;

        let mut views = Vec::with_capacity(appointments.len());
        for appointment in appointments {
            views.push(self.with_derived_status(appointment).await?);
        }
        Ok(views)
    }

    async fn transition(
        &self,
        actor: &Actor,
        id: &AppointmentId,
        next: AppointmentStatus,
    ) -> Result<AppointmentView, Error> {
        let mut appointment = self.load_for_mutation(actor, id).await?;

        if !appointment.status.can_transition_to(next) {
            return Err(Error::conflict(format!(
                "appointment cannot move from {} to {next}",
                appointment.status
            )));
        }

        self.appointments
            .update_status(id, next)
            .await
            .map_err(map_appointment_error)?;
        appointment.status = next;
        self.with_derived_status(appointment).await
    }

    async fn update_details(
        &self,
        actor: &Actor,
        id: &AppointmentId,
        changes: AppointmentChanges,
    ) -> Result<AppointmentView, Error> {
        if changes.is_empty() {
            return Err(Error::invalid_request("update carries no changes"));
        }
        let mut appointment = self.load_for_mutation(actor, id).await?;

        self.appointments
            .update_details(id, &changes)
            .await
            .map_err(map_appointment_error)?;
        changes.apply_to(&mut appointment);
        self.with_derived_status(appointment).await
    }

    async fn delete(&self, actor: &Actor, id: &AppointmentId) -> Result<(), Error> {
        self.load_for_mutation(actor, id).await?;
        self.appointments
            .delete(id)
            .await
            .map_err(map_appointment_error)
    }
}

#[cfg(test)]
#[path = "appointments_service_tests.rs"]
mod tests;
