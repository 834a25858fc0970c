//! Adapters over the hosted data API.
//!
//! The hosted backend exposes row storage under `rest/v1/{table}` with
//! PostgREST-style filters, and named procedures under `functions/v1/{name}`.
//! Each adapter owns transport details only: request serialisation, HTTP error
//! mapping, and JSON decoding into domain types.

mod appointment_repository;
mod client_repository;
mod payment_repository;
mod procedure_runner;
mod rows;
mod service_catalog;
mod transport;

pub use appointment_repository::RestAppointmentRepository;
pub use client_repository::RestClientRepository;
pub use payment_repository::RestPaymentRepository;
pub use procedure_runner::RestProcedureRunner;
pub use service_catalog::RestServiceCatalog;
pub use transport::{RestTransport, TransportError};
