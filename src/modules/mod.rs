pub mod auth;
pub mod health;
pub mod reports;
pub mod sales;

use actix_web::web;

use crate::middleware::{RateLimiter, RequireAuth};

/// Mount every `/api` route.
///
/// `/api/auth/*` is public; sales and reports require a signed-in session.
pub fn configure_api(cfg: &mut web::ServiceConfig, login_limiter: RateLimiter) {
    cfg.service(
        web::scope("/api")
            .configure(|cfg| auth::controllers::configure(cfg, login_limiter))
            // Catch-all scope, must stay last.
            .service(
                web::scope("")
                    .wrap(RequireAuth)
                    .configure(sales::controllers::configure)
                    .configure(reports::controllers::configure),
            ),
    );
}
