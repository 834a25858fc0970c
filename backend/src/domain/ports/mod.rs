//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports describe how the domain expects to talk to adapters (the
//! hosted data API, the procedure host); driving ports are the use-case
//! surface inbound adapters call. Each trait exposes strongly typed errors so
//! adapters map their failures into predictable variants.

mod appointment_desk;
mod appointment_repository;
mod booking_flow;
mod client_repository;
mod payment_ledger;
mod payment_repository;
mod procedure_runner;
mod service_catalog;

#[cfg(test)]
pub use appointment_desk::MockAppointmentDesk;
pub use appointment_desk::{AppointmentDesk, AppointmentView};
#[cfg(test)]
pub use appointment_repository::MockAppointmentRepository;
pub use appointment_repository::{
    AppointmentRepository, AppointmentRepositoryError, FixtureAppointmentRepository,
};
#[cfg(test)]
pub use booking_flow::MockBookingFlow;
pub use booking_flow::{BookingConfirmation, BookingFlow, BookingRequest};
#[cfg(test)]
pub use client_repository::MockClientRepository;
pub use client_repository::{ClientRepository, ClientRepositoryError, FixtureClientRepository};
#[cfg(test)]
pub use payment_ledger::MockPaymentLedger;
pub use payment_ledger::{LedgerSummary, PaymentLedger};
#[cfg(test)]
pub use payment_repository::MockPaymentRepository;
pub use payment_repository::{
    FixturePaymentRepository, PaymentRepository, PaymentRepositoryError,
};
#[cfg(test)]
pub use procedure_runner::MockProcedureRunner;
pub use procedure_runner::{FixtureProcedureRunner, ProcedureError, ProcedureRunner};
#[cfg(test)]
pub use service_catalog::MockServiceCatalog;
pub use service_catalog::{FixtureServiceCatalog, ServiceCatalog, ServiceCatalogError};
