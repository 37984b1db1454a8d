use actix_cors::Cors;
use actix_identity::IdentityMiddleware;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use saleslog::config::{Config, DatabaseConfig, LogFormat};
use saleslog::middleware::{
    json_error_handler, path_error_handler, query_error_handler, session_middleware,
    RateLimiter, SameOriginGuard,
};
use saleslog::modules::{self, auth::hash_password, sales::MySqlSaleRepository};
use saleslog::SaleRepository;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("saleslog={},actix_web=info", config.app.log_level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    match config.app.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

fn cors(allowed_origins: &[String]) -> Cors {
    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allowed_methods(vec!["GET", "POST", "DELETE"])
        .allow_any_header()
        .supports_credentials()
        .max_age(3600)
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // `saleslog hash-password <plain>` prints a value for APP_PASSWORD_HASH
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(String::as_str) == Some("hash-password") {
        let plain = args.get(2).context("usage: saleslog hash-password <password>")?;
        println!("{}", hash_password(plain)?);
        return Ok(());
    }

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    init_tracing(&config);
    config.validate().context("Configuration validation failed")?;

    tracing::info!("Starting saleslog");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    // Create database connection pool
    let db_pool = config
        .database
        .create_pool()
        .await
        .context("Failed to create database pool")?;
    DatabaseConfig::migrate(&db_pool)
        .await
        .context("Failed to apply migrations")?;

    tracing::info!(
        "Database pool initialized ({} connections)",
        config.database.pool_size
    );

    let repository: Arc<dyn SaleRepository> = Arc::new(MySqlSaleRepository::new(db_pool));
    let repository = web::Data::from(repository);
    let timezone = web::Data::new(config.app.timezone);
    let auth_config = web::Data::new(config.auth.clone());
    let login_limiter = RateLimiter::new(config.security.login_rate_limit_per_minute);
    let session_secret = config.auth.session_secret.clone();
    let secure_cookies = config.app.env == "production";
    let cors_origins = config.security.cors_allowed_origins.clone();

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        App::new()
            .app_data(repository.clone())
            .app_data(timezone.clone())
            .app_data(auth_config.clone())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            .wrap(SameOriginGuard)
            .wrap(IdentityMiddleware::default())
            .wrap(session_middleware(&session_secret, secure_cookies))
            .wrap(cors(&cors_origins))
            .wrap(TracingLogger::default())
            .configure(modules::health::configure)
            .configure(|cfg| modules::configure_api(cfg, login_limiter.clone()))
    })
    .workers(config.server.workers)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await.context("HTTP server error")
}
