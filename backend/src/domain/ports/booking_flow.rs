//! Driving port for the public booking flow.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::appointment::AppointmentStatus;
use crate::domain::error::Error;
use crate::domain::ids::{AppointmentId, ClientId, ModelId, ServiceId};
use crate::domain::money::Money;
use crate::domain::payment::PaymentStatus;
use crate::domain::schedule::Slot;

/// A public booking request as validated by the inbound adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    /// The model being booked.
    pub model_id: ModelId,
    /// The chosen service offering.
    pub service_id: ServiceId,
    /// Requested calendar date.
    pub date: NaiveDate,
    /// Requested slot.
    pub slot: Slot,
    /// Client name; the only required contact field.
    pub client_name: String,
    /// Optional client phone, part of the dedup key.
    pub client_phone: Option<String>,
    /// Optional client email.
    pub client_email: Option<String>,
}

/// The outcome of a successful booking.
///
/// `awaiting_confirmation` is always `true` for public bookings: `Pending` is
/// a true intermediate state, and callers must not present the appointment as
/// final.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingConfirmation {
    /// The created appointment.
    pub appointment_id: AppointmentId,
    /// The matched or freshly created client.
    pub client_id: ClientId,
    /// Price snapshot taken from the offering.
    pub price: Money,
    /// Duration snapshot taken from the offering.
    pub duration_minutes: u32,
    /// Lifecycle state of the new appointment (always `Pending`).
    pub status: AppointmentStatus,
    /// Derived ledger state of the new appointment (always `Pending`).
    pub payment_status: PaymentStatus,
    /// Whether the booking still awaits the model's confirmation.
    pub awaiting_confirmation: bool,
}

/// Driving port: turn a public booking request into persisted records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookingFlow: Send + Sync {
    /// Execute the booking steps, failing fast on the first error.
    async fn book(&self, request: BookingRequest) -> Result<BookingConfirmation, Error>;
}
