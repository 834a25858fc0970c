//! Driving port for the payment ledger.

use async_trait::async_trait;

use crate::domain::actor::Actor;
use crate::domain::error::Error;
use crate::domain::ids::{AppointmentId, PaymentId};
use crate::domain::money::Money;
use crate::domain::payment::{Payment, PaymentDraft, PaymentStatus};

/// The full ledger of one appointment plus its derived totals.
///
/// Always rebuilt from a fresh read after any mutation so concurrent writers
/// converge on the same derived status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerSummary {
    /// The appointment the ledger belongs to.
    pub appointment_id: AppointmentId,
    /// Ledger entries ordered by payment date.
    pub entries: Vec<Payment>,
    /// Sum of all entries.
    pub total_paid: Money,
    /// Status derived from the sum versus the appointment price.
    pub payment_status: PaymentStatus,
}

/// Driving port: append to, void from, and read an appointment's ledger.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentLedger: Send + Sync {
    /// Append a payment and return the recomputed summary.
    async fn record(&self, actor: &Actor, draft: PaymentDraft) -> Result<LedgerSummary, Error>;

    /// Remove a payment and return the recomputed summary.
    async fn void(&self, actor: &Actor, id: &PaymentId) -> Result<LedgerSummary, Error>;

    /// Read the current ledger summary.
    async fn ledger(
        &self,
        actor: &Actor,
        appointment_id: &AppointmentId,
    ) -> Result<LedgerSummary, Error>;
}
