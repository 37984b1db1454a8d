//! Login/logout for the single operator account

use actix_identity::Identity;
use actix_web::{web, HttpMessage, HttpRequest, HttpResponse};
use serde::Deserialize;

use crate::config::AuthConfig;
use crate::core::{AppError, Result};
use crate::middleware::RateLimiter;
use crate::modules::auth::services::Authenticator;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

fn header<'a>(req: &'a HttpRequest, name: &str) -> Option<&'a str> {
    req.headers().get(name).and_then(|h| h.to_str().ok())
}

/// POST /api/auth/login
///
/// Client headers are checked before the body is parsed, so foreign callers
/// get 403 whatever they send.
pub async fn login(
    req: HttpRequest,
    auth: web::Data<AuthConfig>,
    body: web::Bytes,
) -> Result<HttpResponse> {
    let authenticator = Authenticator::new(auth.get_ref());
    authenticator.check_client_headers(
        header(&req, "X-App-Auth"),
        header(&req, "X-Requested-With"),
    )?;

    let payload: LoginRequest = serde_json::from_slice(&body)
        .map_err(|e| AppError::validation(format!("Invalid JSON body: {}", e)))?;

    let user = authenticator.authenticate(&payload.username, &payload.password)?;

    Identity::login(&req.extensions(), user.username.clone())
        .map_err(|e| AppError::internal(format!("Failed to start session: {}", e)))?;

    tracing::info!(username = %user.username, "Operator signed in");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "success": true,
        "username": user.username,
    })))
}

/// POST /api/auth/logout
pub async fn logout(identity: Option<Identity>) -> HttpResponse {
    if let Some(identity) = identity {
        identity.logout();
    }
    HttpResponse::NoContent().finish()
}

/// GET /api/auth/me
pub async fn current_user(identity: Option<Identity>) -> Result<HttpResponse> {
    let username = identity
        .and_then(|identity| identity.id().ok())
        .ok_or_else(|| AppError::unauthorized("Not signed in"))?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "username": username })))
}

/// Configure auth routes; `login_limiter` throttles credential guessing
pub fn configure(cfg: &mut web::ServiceConfig, login_limiter: RateLimiter) {
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter)
                    .route(web::post().to(login)),
            )
            .route("/logout", web::post().to(logout))
            .route("/me", web::get().to(current_user)),
    );
}
