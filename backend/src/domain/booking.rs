//! Public booking orchestration.
//!
//! Composes client lookup/creation, offering lookup, and appointment creation
//! into one fail-fast sequence. The three remote calls are independent; there
//! is no transaction around them, and a client created just before a failed
//! appointment insert is left in place (logged, not rolled back).

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::warn;

use crate::domain::appointment::{Appointment, AppointmentDraft};
use crate::domain::client::{Client, ClientContact};
use crate::domain::error::Error;
use crate::domain::payment::PaymentStatus;
use crate::domain::ports::{
    AppointmentRepository, AppointmentRepositoryError, BookingConfirmation, BookingFlow,
    BookingRequest, ClientRepository, ClientRepositoryError, ProcedureRunner, ServiceCatalog,
    ServiceCatalogError,
};
use crate::domain::schedule;
use crate::domain::service_offering::ServiceOffering;

/// Procedure fired after a successful booking; failures are tolerated.
const BOOKING_NOTIFICATION_PROCEDURE: &str = "booking-notification";

fn map_client_error(error: ClientRepositoryError) -> Error {
    match error {
        ClientRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("client store unavailable: {message}"))
        }
        ClientRepositoryError::Query { message } => {
            Error::internal(format!("client store error: {message}"))
        }
    }
}

fn map_catalog_error(error: ServiceCatalogError) -> Error {
    match error {
        ServiceCatalogError::Connection { message } => {
            Error::service_unavailable(format!("service catalogue unavailable: {message}"))
        }
        ServiceCatalogError::Query { message } => {
            Error::internal(format!("service catalogue error: {message}"))
        }
    }
}

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

/// Booking orchestrator implementing the [`BookingFlow`] driving port.
#[derive(Clone)]
pub struct BookingService<C, S, A, P> {
    clients: Arc<C>,
    catalog: Arc<S>,
    appointments: Arc<A>,
    procedures: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<C, S, A, P> BookingService<C, S, A, P> {
    /// Create a booking service over the given adapters.
    pub fn new(
        clients: Arc<C>,
        catalog: Arc<S>,
        appointments: Arc<A>,
        procedures: Arc<P>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            clients,
            catalog,
            appointments,
            procedures,
            clock,
        }
    }
}

impl<C, S, A, P> BookingService<C, S, A, P>
where
    C: ClientRepository,
    S: ServiceCatalog,
    A: AppointmentRepository,
    P: ProcedureRunner,
{
    /// Reuse the first exact (name, phone) match or create a fresh client.
    ///
    /// Returns the client and whether it was created by this call.
    async fn find_or_create_client(
        &self,
        contact: &ClientContact,
        email: Option<String>,
    ) -> Result<(Client, bool), Error> {
        if let Some(existing) = self
            .clients
            .find_by_contact(contact)
            .await
            .map_err(map_client_error)?
        {
            return Ok((existing, false));
        }

        let client = Client::from_contact(contact, email);
        self.clients
            .insert(&client)
            .await
            .map_err(map_client_error)?;
        Ok((client, true))
    }

    async fn load_offering(&self, request: &BookingRequest) -> Result<ServiceOffering, Error> {
        let offering = self
            .catalog
            .find_by_id(&request.service_id)
            .await
            .map_err(map_catalog_error)?
            .ok_or_else(|| {
                Error::not_found(format!("service offering {} not found", request.service_id))
            })?;

        offering
            .validate()
            .map_err(|err| Error::internal(format!("stored service offering is invalid: {err}")))?;

        if !offering.is_active {
            return Err(Error::invalid_request(
                "service offering is no longer available",
            ));
        }
        if offering.model_id != request.model_id {
            return Err(Error::invalid_request(
                "service offering does not belong to the requested model",
            ));
        }
        Ok(offering)
    }

    async fn notify_booking(&self, appointment: &Appointment) {
        let payload = json!({
            "appointmentId": appointment.id,
            "modelId": appointment.model_id,
            "date": appointment.date,
            "slot": appointment.slot.label(),
        });
        if let Err(error) = self
            .procedures
            .invoke(BOOKING_NOTIFICATION_PROCEDURE, payload)
            .await
        {
            warn!(appointment_id = %appointment.id, error = %error, "booking notification failed");
        }
    }
}

#[async_trait]
impl<C, S, A, P> BookingFlow for BookingService<C, S, A, P>
where
    C: ClientRepository,
    S: ServiceCatalog,
    A: AppointmentRepository,
    P: ProcedureRunner,
{
    async fn book(&self, request: BookingRequest) -> Result<BookingConfirmation, Error> {
        let contact = ClientContact::new(&request.client_name, request.client_phone.as_deref())
            .map_err(|err| {
                Error::invalid_request(err.to_string())
                    .with_details(json!({ "field": "clientName" }))
            })?;

        let now = self.clock.utc().naive_utc();
        schedule::ensure_bookable(request.date, request.slot, now)?;

        let (client, client_created) = self
            .find_or_create_client(&contact, request.client_email.clone())
            .await?;

        let offering = self.load_offering(&request).await?;

        let appointment = Appointment::new(AppointmentDraft {
            model_id: request.model_id,
            client_id: client.id,
            service_id: offering.id,
            date: request.date,
            slot: request.slot,
            duration_minutes: offering.duration_minutes,
            price: offering.price,
            location: None,
            observations: None,
            created_by_admin: false,
            created_at: self.clock.utc(),
        })
        .map_err(|err| Error::invalid_request(err.to_string()))?;

        if let Err(error) = self.appointments.insert(&appointment).await {
            if client_created {
                // No compensating delete: accepted orphan-client risk.
                warn!(
                    client_id = %client.id,
                    "booking aborted after client creation; client record left in place"
                );
            }
            return Err(map_appointment_error(error));
        }

        self.notify_booking(&appointment).await;

        Ok(BookingConfirmation {
            appointment_id: appointment.id,
            client_id: client.id,
            price: appointment.price,
            duration_minutes: appointment.duration_minutes,
            status: appointment.status,
            payment_status: PaymentStatus::Pending,
            awaiting_confirmation: true,
        })
    }
}

#[cfg(test)]
#[path = "booking_tests.rs"]
mod tests;
