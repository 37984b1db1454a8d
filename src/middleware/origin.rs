use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, ResponseError,
};
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::rc::Rc;

use crate::core::AppError;

/// Only browser requests coming from the app's own pages may call `/api/`.
///
/// A request passes when its `Origin` equals an allowed origin or its
/// `Referer` starts with one. Allowed origins are `https://{host}` plus the
/// local dev server when the host is `localhost`.
pub struct SameOriginGuard;

/// Dev server origin accepted while running on localhost
const LOCAL_DEV_ORIGIN: &str = "http://localhost:3000";

pub fn allowed_origins(host: &str) -> Vec<String> {
    let mut origins = vec![format!("https://{}", host)];
    if host.contains("localhost") {
        origins.push(LOCAL_DEV_ORIGIN.to_string());
    }
    origins
}

pub fn is_same_origin(host: &str, origin: Option<&str>, referer: Option<&str>) -> bool {
    let allowed = allowed_origins(host);

    let origin_ok = origin.is_some_and(|o| allowed.iter().any(|a| a == o));
    let referer_ok = referer.is_some_and(|r| allowed.iter().any(|a| r.starts_with(a.as_str())));

    origin_ok || referer_ok
}

impl<S, B> Transform<S, ServiceRequest> for SameOriginGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<actix_web::body::EitherBody<actix_web::body::BoxBody, B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SameOriginGuardMiddleware<S>;
    type Future = Ready<std::result::Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SameOriginGuardMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct SameOriginGuardMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for SameOriginGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<actix_web::body::EitherBody<actix_web::body::BoxBody, B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, std::result::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let svc = self.service.clone();

        Box::pin(async move {
            if !req.path().starts_with("/api/") {
                return svc.call(req).await.map(|res| res.map_into_right_body());
            }

            let header = |name: &str| {
                req.headers()
                    .get(name)
                    .and_then(|h| h.to_str().ok())
                    .map(str::to_string)
            };
            let origin = header("origin");
            let referer = header("referer");
            let host = req.connection_info().host().to_string();

            if is_same_origin(&host, origin.as_deref(), referer.as_deref()) {
                return svc.call(req).await.map(|res| res.map_into_right_body());
            }

            tracing::warn!(
                host = %host,
                origin = ?origin,
                referer = ?referer,
                path = %req.path(),
                "Blocked cross-origin API request"
            );
            let http_response = AppError::forbidden("Access denied").error_response();
            Ok(req.into_response(http_response).map_into_left_body())
        })
    }
}
