//! Builders wiring outbound adapters into the HTTP state.
//!
//! With data API settings present the use-cases run against the hosted REST
//! backend; without them everything runs on the shared in-memory store, which
//! keeps local development and smoke tests free of external dependencies.

use std::sync::Arc;

use mockable::{Clock, DefaultClock};

use crate::domain::ports::{AppointmentDesk, BookingFlow, PaymentLedger};
use crate::domain::{
    AppointmentService, AvailabilityService, BookingService, PaymentLedgerService,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryStore;
use crate::outbound::rest::{
    RestAppointmentRepository, RestClientRepository, RestPaymentRepository, RestProcedureRunner,
    RestServiceCatalog, RestTransport,
};
use crate::server::settings::DataApiSettings;

/// Build the HTTP state from the configured backend.
///
/// # Errors
///
/// Returns [`std::io::Error`] when the REST transport cannot be constructed.
pub(crate) fn build_http_state(data_api: Option<&DataApiSettings>) -> std::io::Result<HttpState> {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    match data_api {
        Some(settings) => {
            let transport = RestTransport::new(
                settings.base_url.clone(),
                settings.service_key.clone(),
                settings.timeout,
            )
            .map_err(|error| {
                std::io::Error::other(format!("data API client construction failed: {error}"))
            })?;
            Ok(rest_http_state(&transport, clock))
        }
        None => Ok(memory_http_state(&Arc::new(InMemoryStore::new()), clock)),
    }
}

fn rest_http_state(transport: &RestTransport, clock: Arc<dyn Clock>) -> HttpState {
    let appointments = Arc::new(RestAppointmentRepository::new(transport.clone()));
    let payments = Arc::new(RestPaymentRepository::new(transport.clone()));
    let clients = Arc::new(RestClientRepository::new(transport.clone()));
    let catalog = Arc::new(RestServiceCatalog::new(transport.clone()));
    let procedures = Arc::new(RestProcedureRunner::new(transport.clone()));

    let booking: Arc<dyn BookingFlow> = Arc::new(BookingService::new(
        clients,
        catalog,
        Arc::clone(&appointments),
        procedures,
        Arc::clone(&clock),
    ));
    let desk: Arc<dyn AppointmentDesk> = Arc::new(AppointmentService::new(
        Arc::clone(&appointments),
        Arc::clone(&payments),
    ));
    let ledger: Arc<dyn PaymentLedger> =
        Arc::new(PaymentLedgerService::new(payments, appointments));

    HttpState::new(
        booking,
        desk,
        ledger,
        Arc::new(AvailabilityService::new(clock)),
    )
}

fn memory_http_state(store: &Arc<InMemoryStore>, clock: Arc<dyn Clock>) -> HttpState {
    let booking: Arc<dyn BookingFlow> = Arc::new(BookingService::new(
        Arc::clone(store),
        Arc::clone(store),
        Arc::clone(store),
        Arc::new(crate::domain::ports::FixtureProcedureRunner),
        Arc::clone(&clock),
    ));
    let desk: Arc<dyn AppointmentDesk> = Arc::new(AppointmentService::new(
        Arc::clone(store),
        Arc::clone(store),
    ));
    let ledger: Arc<dyn PaymentLedger> = Arc::new(PaymentLedgerService::new(
        Arc::clone(store),
        Arc::clone(store),
    ));

    HttpState::new(
        booking,
        desk,
        ledger,
        Arc::new(AvailabilityService::new(clock)),
    )
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use std::time::Duration;

    use super::*;

    fn data_api() -> DataApiSettings {
        DataApiSettings {
            base_url: "https://data.example.com/"
                .parse()
                .expect("valid test URL"),
            service_key: "service-key".to_owned(),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn rest_backend_builds_without_touching_the_network() {
        build_http_state(Some(&data_api())).expect("REST-backed state");
    }

    #[test]
    fn missing_data_api_selects_the_memory_store() {
        build_http_state(None).expect("memory-backed state");
    }
}
