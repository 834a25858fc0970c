//! Port for the payment ledger.
//!
//! The ledger is append-and-delete only; there is no update. Status is always
//! derived from a fresh read of the amounts, never cached by an adapter.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::ids::{AppointmentId, PaymentId};
use crate::domain::money::Money;
use crate::domain::payment::Payment;

/// Errors raised by payment repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaymentRepositoryError {
    /// The backend could not be reached.
    #[error("payment ledger unreachable: {message}")]
    Connection {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// A query or mutation failed during execution.
    #[error("payment ledger query failed: {message}")]
    Query {
        /// Adapter-supplied failure description.
        message: String,
    },
    /// A mutation targeted a ledger entry that does not exist.
    #[error("payment {id} not found")]
    NotFound {
        /// The missing entry id.
        id: PaymentId,
    },
}

impl PaymentRepositoryError {
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

/// Port for appending to and reading an appointment's payment ledger.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Append a ledger entry.
    async fn insert(&self, payment: &Payment) -> Result<(), PaymentRepositoryError>;

    /// Find a ledger entry by id.
    async fn find_by_id(
        &self,
        id: &PaymentId,
    ) -> Result<Option<Payment>, PaymentRepositoryError>;

    /// Remove a ledger entry.
    async fn delete(&self, id: &PaymentId) -> Result<(), PaymentRepositoryError>;

    /// The full ledger for one appointment, ordered by payment date.
    async fn list_for_appointment(
        &self,
        appointment_id: &AppointmentId,
    ) -> Result<Vec<Payment>, PaymentRepositoryError>;

    /// Just the amounts of the full ledger for one appointment.
    async fn amounts_for_appointment(
        &self,
        appointment_id: &AppointmentId,
    ) -> Result<Vec<Money>, PaymentRepositoryError>;
}

/// Fixture implementation for tests that do not exercise the ledger.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePaymentRepository;

#[async_trait]
impl PaymentRepository for FixturePaymentRepository {
    async fn insert(&self, _payment: &Payment) -> Result<(), PaymentRepositoryError> {
        Ok(())
    }

    async fn find_by_id(
        &self,
        _id: &PaymentId,
    ) -> Result<Option<Payment>, PaymentRepositoryError> {
        Ok(None)
    }

    async fn delete(&self, id: &PaymentId) -> Result<(), PaymentRepositoryError> {
        Err(PaymentRepositoryError::NotFound { id: *id })
    }

    async fn list_for_appointment(
        &self,
        _appointment_id: &AppointmentId,
    ) -> Result<Vec<Payment>, PaymentRepositoryError> {
        Ok(Vec::new())
    }

    async fn amounts_for_appointment(
        &self,
        _appointment_id: &AppointmentId,
    ) -> Result<Vec<Money>, PaymentRepositoryError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    #[tokio::test]
    async fn fixture_ledger_is_empty() {
        let repo = FixturePaymentRepository;
        let amounts = repo
            .amounts_for_appointment(&AppointmentId::random())
            .await
            .expect("fixture read");
        assert!(amounts.is_empty());
    }
}
