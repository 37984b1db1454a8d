pub mod auth;
pub mod error_handler;
pub mod origin;
pub mod rate_limit;

pub use auth::{session_middleware, RequireAuth, SESSION_COOKIE_NAME};
pub use error_handler::{json_error_handler, path_error_handler, query_error_handler};
pub use origin::SameOriginGuard;
pub use rate_limit::RateLimiter;
