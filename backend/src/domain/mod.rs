//! Domain primitives, aggregates, and services.
//!
//! Purpose: Define the strongly typed booking model used by the API and
//! persistence layers, plus the services that implement the driving ports
//! over the outbound adapters. Keep types immutable where possible and
//! document invariants and serialisation contracts (serde) in each type's
//! Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode — API error response payload and stable identifiers.
//! - Actor — the authenticated caller on whose behalf a mutation runs.
//! - Money — non-negative amounts in centavos, serialised as decimal strings.
//! - schedule — the fixed slot grid and availability rules.
//! - Appointment / Payment / Client / ServiceOffering — booking aggregates.
//! - BookingService / AppointmentService / PaymentLedgerService — services
//!   implementing the driving ports in [`ports`].

pub mod actor;
pub mod appointment;
pub mod appointments_service;
pub mod booking;
pub mod client;
pub mod error;
pub mod ids;
pub mod money;
pub mod payment;
pub mod payments_service;
pub mod ports;
pub mod schedule;
pub mod service_offering;

pub use self::actor::Actor;
pub use self::appointment::{
    Appointment, AppointmentChanges, AppointmentDraft, AppointmentStatus,
    AppointmentValidationError,
};
pub use self::appointments_service::AppointmentService;
pub use self::booking::BookingService;
pub use self::client::{Client, ClientContact, ClientValidationError};
pub use self::error::{Error, ErrorCode};
pub use self::ids::{AdminId, AppointmentId, ClientId, ModelId, PaymentId, ServiceId};
pub use self::money::{Money, MoneyError};
pub use self::payment::{
    derive_payment_status, Payment, PaymentDraft, PaymentMethod, PaymentStatus,
    PaymentValidationError,
};
pub use self::payments_service::PaymentLedgerService;
pub use self::schedule::{day_slots, AvailabilityService, Slot, SlotParseError};
pub use self::service_offering::{ServiceOffering, ServiceOfferingValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
