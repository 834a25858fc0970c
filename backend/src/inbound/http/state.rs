//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AppointmentDesk, BookingFlow, PaymentLedger};
use crate::domain::AvailabilityService;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Public booking use-case.
    pub booking: Arc<dyn BookingFlow>,
    /// Appointment lifecycle use-case.
    pub appointments: Arc<dyn AppointmentDesk>,
    /// Payment ledger use-case.
    pub payments: Arc<dyn PaymentLedger>,
    /// Slot availability queries.
    pub availability: Arc<AvailabilityService>,
}

impl HttpState {
    /// Bundle the use-case implementations handlers depend on.
    pub fn new(
        booking: Arc<dyn BookingFlow>,
        appointments: Arc<dyn AppointmentDesk>,
        payments: Arc<dyn PaymentLedger>,
        availability: Arc<AvailabilityService>,
    ) -> Self {
        Self {
            booking,
            appointments,
            payments,
            availability,
        }
    }
}
