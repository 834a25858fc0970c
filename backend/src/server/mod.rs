//! Server construction and middleware wiring.

mod settings;
mod state_builders;

pub use settings::{
    server_settings_from_env, BuildMode, DataApiSettings, ServerSettings, SessionSettings,
    SettingsError,
};

use actix_session::{
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
    SessionMiddleware,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpServer};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::appointments::{
    delete_appointment, get_appointment, list_appointments, transition_appointment,
    update_appointment,
};
use crate::inbound::http::availability::list_availability;
use crate::inbound::http::bookings::create_booking;
use crate::inbound::http::health::{live, ready, HealthState};
use crate::inbound::http::payments::{get_ledger, record_payment, void_payment};
use crate::inbound::http::state::HttpState;
use state_builders::build_http_state;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let api = web::scope("/api/v1")
        .wrap(session)
        .service(create_booking)
        .service(list_availability)
        .service(list_appointments)
        .service(get_appointment)
        .service(transition_appointment)
        .service(update_appointment)
        .service(delete_appointment)
        .service(record_payment)
        .service(get_ledger)
        .service(void_payment);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct the HTTP server from fully validated settings.
///
/// The returned [`Server`] must be awaited to drive the listener; the health
/// state flips to ready once the socket is bound.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when the outbound adapters cannot be built
/// or binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    settings: ServerSettings,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(settings.data_api.as_ref())?);
    let SessionSettings {
        key,
        cookie_secure,
        same_site,
    } = settings.session;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(settings.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
