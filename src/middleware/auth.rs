use crate::core::AppError;
use crate::modules::auth::AuthenticatedUser;
use actix_identity::IdentityExt;
use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::{
    body::{BoxBody, EitherBody},
    cookie::{Key, SameSite},
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage, ResponseError,
};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

/// Name of the signed session cookie
pub const SESSION_COOKIE_NAME: &str = "saleslog_session";

/// Cookie-backed session store signed with `secret` (at least 64 bytes)
pub fn session_middleware(secret: &str, secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::from(secret.as_bytes()))
        .cookie_name(SESSION_COOKIE_NAME.to_string())
        .cookie_secure(secure)
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Strict)
        .build()
}

/// Rejects requests without a signed-in identity.
///
/// On success the resolved `AuthenticatedUser` is stored in the request
/// extensions for handlers (`web::ReqData<AuthenticatedUser>`).
pub struct RequireAuth;

impl<S, B> Transform<S, ServiceRequest> for RequireAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<BoxBody, B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireAuthMiddleware<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<BoxBody, B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let svc = self.service.clone();

        Box::pin(async move {
            let username = req
                .get_identity()
                .ok()
                .and_then(|identity| identity.id().ok());

            let Some(username) = username else {
                tracing::debug!(path = %req.path(), "Rejected request without session");
                let http_response = AppError::unauthorized("Sign in required").error_response();
                return Ok(req.into_response(http_response).map_into_left_body());
            };

            req.extensions_mut().insert(AuthenticatedUser::new(username));

            svc.call(req).await.map(|res| res.map_into_right_body())
        })
    }
}
