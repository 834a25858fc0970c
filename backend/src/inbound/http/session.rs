//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The session cookie carries the acting identity established by the
//! authentication callback: a role label plus the account id. Handlers only
//! ever see a resolved [`Actor`]; an absent or tampered cookie degrades to the
//! public actor instead of failing the request, so each endpoint decides what
//! the public actor may do.

use actix_session::Session;
use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::LocalBoxFuture;
use tracing::warn;
use uuid::Uuid;

use crate::domain::{Actor, AdminId, Error, ModelId};

pub(crate) const ACTOR_ROLE_KEY: &str = "actor_role";
pub(crate) const ACTOR_ID_KEY: &str = "actor_id";

const ROLE_ADMIN: &str = "admin";
const ROLE_MODEL: &str = "model";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    #[must_use]
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    fn persist(&self, role: &str, id: Uuid) -> Result<(), Error> {
        self.0
            .insert(ACTOR_ROLE_KEY, role)
            .and_then(|()| self.0.insert(ACTOR_ID_KEY, id.to_string()))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Persist an administrator identity in the session cookie.
    pub fn persist_admin(&self, id: &AdminId) -> Result<(), Error> {
        self.persist(ROLE_ADMIN, *id.as_uuid())
    }

    /// Persist a model identity in the session cookie.
    pub fn persist_model(&self, id: &ModelId) -> Result<(), Error> {
        self.persist(ROLE_MODEL, *id.as_uuid())
    }

    /// Drop the stored identity.
    pub fn clear(&self) {
        self.0.purge();
    }

    /// Resolve the session into the acting identity.
    ///
    /// Missing or unreadable session contents resolve to [`Actor::Public`];
    /// only a session-store failure surfaces as an error.
    pub fn actor(&self) -> Result<Actor, Error> {
        let role = self
            .0
            .get::<String>(ACTOR_ROLE_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        let id = self
            .0
            .get::<String>(ACTOR_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;

        let (Some(role), Some(raw_id)) = (role, id) else {
            return Ok(Actor::Public);
        };
        let Ok(id) = Uuid::parse_str(&raw_id) else {
            warn!("invalid actor id in session cookie");
            return Ok(Actor::Public);
        };
        match role.as_str() {
            ROLE_ADMIN => Ok(Actor::Admin(AdminId::from(id))),
            ROLE_MODEL => Ok(Actor::Model(ModelId::from(id))),
            other => {
                warn!(role = other, "unknown actor role in session cookie");
                Ok(Actor::Public)
            }
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use actix_session::Session;
    use actix_web::http::StatusCode;
    use actix_web::{test, web, App, HttpResponse};

    use super::*;

    fn session_test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().wrap(crate::inbound::http::test_utils::test_session_middleware())
    }

    #[actix_web::test]
    async fn round_trips_a_model_identity() {
        let model_id = ModelId::random();
        let app = test::init_service(
            session_test_app()
                .route(
                    "/set",
                    web::get().to(move |session: SessionContext| async move {
                        session.persist_model(&model_id)?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/get",
                    web::get().to(|session: SessionContext| async move {
                        let actor = session.actor()?;
                        let body = match actor {
                            Actor::Model(id) => id.to_string(),
                            other => format!("{other:?}"),
                        };
                        Ok::<_, Error>(HttpResponse::Ok().body(body))
                    }),
                ),
        )
        .await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        assert_eq!(set_res.status(), StatusCode::OK);
        let cookie = set_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set");

        let get_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/get")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(get_res.status(), StatusCode::OK);
        let body = test::read_body(get_res).await;
        assert_eq!(body, model_id.to_string().as_bytes());
    }

    #[actix_web::test]
    async fn round_trips_an_admin_identity_and_clear_drops_it() {
        let admin_id = AdminId::random();
        let app = test::init_service(
            session_test_app()
                .route(
                    "/set",
                    web::get().to(move |session: SessionContext| async move {
                        session.persist_admin(&admin_id)?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/clear",
                    web::get().to(|session: SessionContext| async move {
                        session.clear();
                        HttpResponse::Ok()
                    }),
                )
                .route(
                    "/get",
                    web::get().to(|session: SessionContext| async move {
                        let actor = session.actor()?;
                        let body = match actor {
                            Actor::Admin(id) => id.to_string(),
                            other => format!("{other:?}"),
                        };
                        Ok::<_, Error>(HttpResponse::Ok().body(body))
                    }),
                ),
        )
        .await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        assert_eq!(set_res.status(), StatusCode::OK);
        let cookie = set_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();

        let get_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/get")
                .cookie(cookie.clone())
                .to_request(),
        )
        .await;
        assert_eq!(test::read_body(get_res).await, admin_id.to_string().as_bytes());

        // Purging issues a removal cookie; presenting it resolves to public.
        let clear_res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/clear")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(clear_res.status(), StatusCode::OK);
        let removal = clear_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("removal cookie set")
            .into_owned();

        let after_clear = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/get")
                .cookie(removal)
                .to_request(),
        )
        .await;
        assert_eq!(test::read_body(after_clear).await, "Public".as_bytes());
    }

    #[actix_web::test]
    async fn missing_session_resolves_to_the_public_actor() {
        let app = test::init_service(session_test_app().route(
            "/actor",
            web::get().to(|session: SessionContext| async move {
                let actor = session.actor()?;
                Ok::<_, Error>(HttpResponse::Ok().body(format!("{:?}", actor.is_public())))
            }),
        ))
        .await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/actor").to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(test::read_body(res).await, "true".as_bytes());
    }

    #[actix_web::test]
    async fn tampered_actor_id_degrades_to_public() {
        let app = test::init_service(
            session_test_app()
                .route(
                    "/set-invalid",
                    web::get().to(|session: Session| async move {
                        session
                            .insert(ACTOR_ROLE_KEY, ROLE_ADMIN)
                            .expect("set role");
                        session
                            .insert(ACTOR_ID_KEY, "not-a-uuid")
                            .expect("set invalid id");
                        HttpResponse::Ok()
                    }),
                )
                .route(
                    "/actor",
                    web::get().to(|session: SessionContext| async move {
                        let actor = session.actor()?;
                        Ok::<_, Error>(HttpResponse::Ok().body(format!("{:?}", actor.is_public())))
                    }),
                ),
        )
        .await;

        let set_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/set-invalid").to_request(),
        )
        .await;
        let cookie = set_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set");

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/actor")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(test::read_body(res).await, "true".as_bytes());
    }
}
