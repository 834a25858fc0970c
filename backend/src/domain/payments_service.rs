//! Payment ledger service.
//!
//! Implements the [`PaymentLedger`] driving port. Every mutation ends with a
//! fresh read of the full ledger and a recomputation of the derived status;
//! nothing increments a stored counter, so concurrent writers converge.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::actor::Actor;
use crate::domain::appointment::Appointment;
use crate::domain::error::Error;
use crate::domain::ids::{AppointmentId, PaymentId};
use crate::domain::money::Money;
use crate::domain::payment::{derive_payment_status, Payment, PaymentDraft};
use crate::domain::ports::{
    AppointmentRepository, AppointmentRepositoryError, LedgerSummary, PaymentLedger,
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

/// Ledger access requires administrative authority or the owning model.
fn authorize_ledger(actor: &Actor, appointment: &Appointment) -> Result<(), Error> {
    match actor {
        Actor::Admin(_) => Ok(()),
        Actor::Model(own) if *own == appointment.model_id => Ok(()),
        Actor::Model(_) => Err(Error::forbidden(
            "the ledger of another model's appointment is not accessible",
        )),
        Actor::Public => Err(Error::unauthorized("authentication required")),
    }
}

/// Ledger service over the payment and appointment stores.
#[derive(Clone)]
pub struct PaymentLedgerService<P, A> {
    payments: Arc<P>,
    appointments: Arc<A>,
}

impl<P, A> PaymentLedgerService<P, A> {
    /// Create a ledger service over the given adapters.
    pub fn new(payments: Arc<P>, appointments: Arc<A>) -> Self {
        Self {
            payments,
            appointments,
        }
    }
}

impl<P, A> PaymentLedgerService<P, A>
where
    P: PaymentRepository,
    A: AppointmentRepository,
{
    async fn load_appointment(&self, id: &AppointmentId) -> Result<Appointment, Error> {
        self.appointments
            .find_by_id(id)
            .await
            .map_err(map_appointment_error)?
            .ok_or_else(|| Error::not_found(format!("appointment {id} not found")))
    }

    /// Rebuild the summary from a fresh read of the full ledger.
    async fn summarize(&self, appointment: &Appointment) -> Result<LedgerSummary, Error> {
        let entries = self
            .payments
            .list_for_appointment(&appointment.id)
            .await
            .map_err(map_payment_error)?;
        let amounts: Vec<Money> = entries.iter().map(|entry| entry.amount).collect();
        let total_paid = Money::sum(amounts.iter().copied())
            .map_err(|err| Error::internal(format!("ledger sum failed: {err}")))?;
        let payment_status = derive_payment_status(appointment.price, amounts)
            .map_err(|err| Error::internal(format!("ledger sum failed: {err}")))?;
        Ok(LedgerSummary {
            appointment_id: appointment.id,
            entries,
            total_paid,
            payment_status,
        })
    }
}

#[async_trait]
impl<P, A> PaymentLedger for PaymentLedgerService<P, A>
where
    P: PaymentRepository,
    A: AppointmentRepository,
{
    async fn record(&self, actor: &Actor, draft: PaymentDraft) -> Result<LedgerSummary, Error> {
        let appointment = self.load_appointment(&draft.appointment_id).await?;
        authorize_ledger(actor, &appointment)?;

        let payment =
            Payment::new(draft).map_err(|err| Error::invalid_request(err.to_string()))?;
        self.payments
            .insert(&payment)
            .await
            .map_err(map_payment_error)?;

        self.summarize(&appointment).await
    }

    async fn void(&self, actor: &Actor, id: &PaymentId) -> Result<LedgerSummary, Error> {
        let payment = self
            .payments
            .find_by_id(id)
            .await
            .map_err(map_payment_error)?
            .ok_or_else(|| Error::not_found(format!("payment {id} not found")))?;
        let appointment = self.load_appointment(&payment.appointment_id).await?;
        authorize_ledger(actor, &appointment)?;

        self.payments.delete(id).await.map_err(map_payment_error)?;

        self.summarize(&appointment).await
    }

    async fn ledger(
        &self,
        actor: &Actor,
        appointment_id: &AppointmentId,
    ) -> Result<LedgerSummary, Error> {
        let appointment = self.load_appointment(appointment_id).await?;
        authorize_ledger(actor, &appointment)?;
        self.summarize(&appointment).await
    }
}

#[cfg(test)]
#[path = "payments_service_tests.rs"]
mod tests;
