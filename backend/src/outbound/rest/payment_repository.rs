//! Hosted-data-API adapter for the payment repository port.

use async_trait::async_trait;

use super::rows::{AmountRow, PaymentRow};
use super::transport::{RestTransport, TransportError};
use crate::domain::ids::{AppointmentId, PaymentId};
use crate::domain::money::Money;
use crate::domain::payment::Payment;
use crate::domain::ports::{PaymentRepository, PaymentRepositoryError};

const TABLE: &str = "payments";

fn map_transport_error(error: TransportError) -> PaymentRepositoryError {
    match error {
        TransportError::Connection { message } => PaymentRepositoryError::connection(message),
        other => PaymentRepositoryError::query(other.to_string()),
    }
}

/// Payment ledger backed by the `payments` table.
#[derive(Debug, Clone)]
pub struct RestPaymentRepository {
    transport: RestTransport,
}

impl RestPaymentRepository {
    /// Build an adapter over a shared transport.
    #[must_use]
    pub fn new(transport: RestTransport) -> Self {
        Self { transport }
    }
}

#[async_trait]
impl PaymentRepository for RestPaymentRepository {
    async fn insert(&self, payment: &Payment) -> Result<(), PaymentRepositoryError> {
        self.transport
            .insert(TABLE, &PaymentRow::from(payment))
            .await
            .map_err(map_transport_error)
    }

    async fn find_by_id(
        &self,
        id: &PaymentId,
    ) -> Result<Option<Payment>, PaymentRepositoryError> {
        let rows: Vec<PaymentRow> = self
            .transport
            .select(TABLE, &[("id", format!("eq.{id}"))])
            .await
            .map_err(map_transport_error)?;
        rows.into_iter()
            .next()
            .map(Payment::try_from)
            .transpose()
            .map_err(|error| PaymentRepositoryError::query(error.to_string()))
    }

    async fn delete(&self, id: &PaymentId) -> Result<(), PaymentRepositoryError> {
        let removed = self
            .transport
            .delete(TABLE, &[("id", format!("eq.{id}"))])
            .await
            .map_err(map_transport_error)?;
        if removed == 0 {
            return Err(PaymentRepositoryError::NotFound { id: *id });
        }
        Ok(())
    }

    async fn list_for_appointment(
        &self,
        appointment_id: &AppointmentId,
    ) -> Result<Vec<Payment>, PaymentRepositoryError> {
        let rows: Vec<PaymentRow> = self
            .transport
            .select(
                TABLE,
                &[
                    ("appointment_id", format!("eq.{appointment_id}")),
                    ("order", "payment_date.asc".to_owned()),
                ],
            )
            .await
            .map_err(map_transport_error)?;
        rows.into_iter()
            .map(Payment::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|error| PaymentRepositoryError::query(error.to_string()))
    }

    async fn amounts_for_appointment(
        &self,
        appointment_id: &AppointmentId,
    ) -> Result<Vec<Money>, PaymentRepositoryError> {
        let rows: Vec<AmountRow> = self
            .transport
            .select(
                TABLE,
                &[
                    ("appointment_id", format!("eq.{appointment_id}")),
                    ("select", "amount".to_owned()),
                ],
            )
            .await
            .map_err(map_transport_error)?;
        rows.into_iter()
            .map(Money::try_from)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|error| PaymentRepositoryError::query(error.to_string()))
    }
}
