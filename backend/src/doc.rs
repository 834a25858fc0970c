//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] generates the specification for the REST API: the booking,
//! availability, appointment, payment, and health paths, the adapter DTO
//! schemas, the [`ErrorSchema`]/[`ErrorCodeSchema`] wrappers for the domain
//! error type, and the session cookie security scheme. Swagger UI serves the
//! document in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::appointments::{AppointmentDto, DetailsBody, StatusBody};
use crate::inbound::http::availability::AvailabilityResponse;
use crate::inbound::http::bookings::{BookingBody, BookingResponse};
use crate::inbound::http::payments::{LedgerDto, PaymentBody, PaymentDto};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie carrying the authenticated actor.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Booking backend API",
        description = "HTTP interface for public bookings, appointment management, \
                       and payment ledgers."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::bookings::create_booking,
        crate::inbound::http::availability::list_availability,
        crate::inbound::http::appointments::list_appointments,
        crate::inbound::http::appointments::get_appointment,
        crate::inbound::http::appointments::transition_appointment,
        crate::inbound::http::appointments::update_appointment,
        crate::inbound::http::appointments::delete_appointment,
        crate::inbound::http::payments::record_payment,
        crate::inbound::http::payments::get_ledger,
        crate::inbound::http::payments::void_payment,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        BookingBody,
        BookingResponse,
        AvailabilityResponse,
        AppointmentDto,
        StatusBody,
        DetailsBody,
        PaymentBody,
        PaymentDto,
        LedgerDto,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "bookings", description = "Public booking flow"),
        (name = "availability", description = "Slot availability for clients"),
        (name = "appointments", description = "Appointment lifecycle management"),
        (name = "payments", description = "Payment ledgers and derived status"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
