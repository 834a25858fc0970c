//! Mutex-guarded in-process store implementing the driven ports.
//!
//! Used for local runs without a hosted data API and as the substrate for
//! end-to-end service tests. One store implements all four repository ports so
//! a single instance can back the whole application.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::appointment::{Appointment, AppointmentChanges, AppointmentStatus};
use crate::domain::client::{Client, ClientContact};
use crate::domain::ids::{AppointmentId, ClientId, ModelId, PaymentId, ServiceId};
use crate::domain::money::Money;
use crate::domain::payment::Payment;
use crate::domain::ports::{
    AppointmentRepository, AppointmentRepositoryError, ClientRepository, ClientRepositoryError,
    PaymentRepository, PaymentRepositoryError, ServiceCatalog, ServiceCatalogError,
};
use crate::domain::service_offering::ServiceOffering;

const POISONED: &str = "in-memory store mutex poisoned";

#[derive(Debug, Default)]
struct State {
    appointments: HashMap<AppointmentId, Appointment>,
    payments: HashMap<PaymentId, Payment>,
    clients: HashMap<ClientId, Client>,
    services: HashMap<ServiceId, ServiceOffering>,
}

/// In-process store backing every driven port.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, State>, &'static str> {
        self.state.lock().map_err(|_| POISONED)
    }

    /// Seed a service offering, replacing any previous record with the id.
    pub fn seed_offering(&self, offering: ServiceOffering) -> Result<(), ServiceCatalogError> {
        let mut state = self.state().map_err(ServiceCatalogError::query)?;
        state.services.insert(offering.id, offering);
        Ok(())
    }

    /// Seed a client, replacing any previous record with the id.
    pub fn seed_client(&self, client: Client) -> Result<(), ClientRepositoryError> {
        let mut state = self.state().map_err(ClientRepositoryError::query)?;
        state.clients.insert(client.id, client);
        Ok(())
    }
}

#[async_trait]
impl AppointmentRepository for InMemoryStore {
    async fn insert(&self, appointment: &Appointment) -> Result<(), AppointmentRepositoryError> {
        let mut state = self.state().map_err(AppointmentRepositoryError::query)?;
        state.appointments.insert(appointment.id, appointment.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &AppointmentId,
    ) -> Result<Option<Appointment>, AppointmentRepositoryError> {
        let state = self.state().map_err(AppointmentRepositoryError::query)?;
        Ok(state.appointments.get(id).cloned())
    }

    async fn list_for_model_on_day(
        &self,
        model_id: &ModelId,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, AppointmentRepositoryError> {
        let state = self.state().map_err(AppointmentRepositoryError::query)?;
        let mut found: Vec<Appointment> = state
            .appointments
            .values()
            .filter(|appointment| appointment.model_id == *model_id && appointment.date == date)
            .cloned()
            .collect();
        found.sort_by_key(|appointment| appointment.slot);
        Ok(found)
    }

    async fn update_status(
        &self,
        id: &AppointmentId,
        status: AppointmentStatus,
    ) -> Result<(), AppointmentRepositoryError> {
        let mut state = self.state().map_err(AppointmentRepositoryError::query)?;
        let appointment = state
            .appointments
            .get_mut(id)
            .ok_or(AppointmentRepositoryError::NotFound { id: *id })?;
        appointment.status = status;
        Ok(())
    }

    async fn update_details(
        &self,
        id: &AppointmentId,
        changes: &AppointmentChanges,
    ) -> Result<(), AppointmentRepositoryError> {
        let mut state = self.state().map_err(AppointmentRepositoryError::query)?;
        let appointment = state
            .appointments
            .get_mut(id)
            .ok_or(AppointmentRepositoryError::NotFound { id: *id })?;
        changes.apply_to(appointment);
        Ok(())
    }

    async fn delete(&self, id: &AppointmentId) -> Result<(), AppointmentRepositoryError> {
        let mut state = self.state().map_err(AppointmentRepositoryError::query)?;
        state
            .appointments
            .remove(id)
            .map(|_| ())
            .ok_or(AppointmentRepositoryError::NotFound { id: *id })
    }
}

#[async_trait]
impl PaymentRepository for InMemoryStore {
    async fn insert(&self, payment: &Payment) -> Result<(), PaymentRepositoryError> {
        let mut state = self.state().map_err(PaymentRepositoryError::query)?;
        state.payments.insert(payment.id, payment.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &PaymentId,
    ) -> Result<Option<Payment>, PaymentRepositoryError> {
        let state = self.state().map_err(PaymentRepositoryError::query)?;
        Ok(state.payments.get(id).cloned())
    }

    async fn delete(&self, id: &PaymentId) -> Result<(), PaymentRepositoryError> {
        let mut state = self.state().map_err(PaymentRepositoryError::query)?;
        state
            .payments
            .remove(id)
            .map(|_| ())
            .ok_or(PaymentRepositoryError::NotFound { id: *id })
    }

    async fn list_for_appointment(
        &self,
        appointment_id: &AppointmentId,
    ) -> Result<Vec<Payment>, PaymentRepositoryError> {
        let state = self.state().map_err(PaymentRepositoryError::query)?;
        let mut found: Vec<Payment> = state
            .payments
            .values()
            .filter(|payment| payment.appointment_id == *appointment_id)
            .cloned()
            .collect();
        found.sort_by_key(|payment| (payment.payment_date, payment.id));
        Ok(found)
    }

    async fn amounts_for_appointment(
        &self,
        appointment_id: &AppointmentId,
    ) -> Result<Vec<Money>, PaymentRepositoryError> {
        let entries = self.list_for_appointment(appointment_id).await?;
        Ok(entries.into_iter().map(|payment| payment.amount).collect())
    }
}

#[async_trait]
impl ClientRepository for InMemoryStore {
    async fn insert(&self, client: &Client) -> Result<(), ClientRepositoryError> {
        let mut state = self.state().map_err(ClientRepositoryError::query)?;
        state.clients.insert(client.id, client.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ClientId) -> Result<Option<Client>, ClientRepositoryError> {
        let state = self.state().map_err(ClientRepositoryError::query)?;
        Ok(state.clients.get(id).cloned())
    }

    async fn find_by_contact(
        &self,
        contact: &ClientContact,
    ) -> Result<Option<Client>, ClientRepositoryError> {
        let state = self.state().map_err(ClientRepositoryError::query)?;
        Ok(state
            .clients
            .values()
            .find(|client| contact.matches(client))
            .cloned())
    }
}

#[async_trait]
impl ServiceCatalog for InMemoryStore {
    async fn find_by_id(
        &self,
        id: &ServiceId,
    ) -> Result<Option<ServiceOffering>, ServiceCatalogError> {
        let state = self.state().map_err(ServiceCatalogError::query)?;
        Ok(state.services.get(id).cloned())
    }

    async fn list_active_for_model(
        &self,
        model_id: &ModelId,
    ) -> Result<Vec<ServiceOffering>, ServiceCatalogError> {
        let state = self.state().map_err(ServiceCatalogError::query)?;
        let mut found: Vec<ServiceOffering> = state
            .services
            .values()
            .filter(|offering| offering.model_id == *model_id && offering.is_active)
            .cloned()
            .collect();
        found.sort_by(|left, right| left.name.cmp(&right.name));
        Ok(found)
    }
}
