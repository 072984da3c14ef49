//! Freight backend server
//!
//! HTTP backend for the multi-tenant freight management system: pricing
//! administration, trip recording with automatic cost calculation, and
//! period reports.

use actix_cors::Cors;
use actix_web::{http::header, middleware, web, App, HttpResponse, HttpServer};
use frete_api::handlers::{
    configure_auth, configure_dashboard, configure_fee_bands, configure_rates, configure_reports,
    configure_trips, configure_users,
};
use frete_auth::{JwtService, PasswordService};
use frete_cache::RedisCache;
use frete_core::traits::PricingService;
use frete_core::AppConfig;
use frete_db::{create_pool, PgFeeBandRepository, PgRateRepository};
use frete_services::PricingServiceImpl;
use std::env;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Health check endpoint
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "frete-backend",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Configure API routes
fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            // Health check
            .route("/health", web::get().to(health_check))
            // Dashboard (current-month totals)
            .configure(configure_dashboard)
            // Auth endpoints
            .configure(configure_auth)
            // User management endpoints (superadmin only)
            .configure(configure_users)
            // Rate administration (per-km / per-kg)
            .configure(configure_rates)
            // Departure fee bands
            .configure(configure_fee_bands)
            // Trips (quote, record, list)
            .configure(configure_trips)
            // Period reports
            .configure(configure_reports),
    );
}

/// Initialize tracing/logging
fn init_tracing() {
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "frete_backend={},frete_api={},frete_db={},frete_services={},actix_web=info,sqlx=warn",
            log_level, log_level, log_level, log_level
        ))
    });

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging
    init_tracing();

    info!("Starting frete-backend v{}", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load().expect("Failed to load configuration");

    // Create auth services
    let jwt_service = Arc::new(JwtService::new(
        &config.auth.jwt_secret,
        config.auth.jwt_expiration_secs,
    ));
    let password_service = Arc::new(PasswordService::new());

    info!(
        "JWT service configured with {} second token expiration",
        config.auth.jwt_expiration_secs
    );

    info!("Connecting to database...");
    let pool = create_pool(&config.database.url, Some(config.database.max_connections))
        .await
        .expect("Failed to create database pool");

    info!(
        "Database connection established with {} max connections",
        config.database.max_connections
    );

    info!("Connecting to Redis...");
    let cache = Arc::new(
        RedisCache::new(&config.redis.url)
            .await
            .expect("Failed to connect to Redis"),
    );

    // Pricing service shared by the quote endpoint and the
    // rate/fee-band handlers (cache invalidation)
    let pricing: Arc<dyn PricingService> = Arc::new(PricingServiceImpl::new(
        Arc::new(PgRateRepository::new(pool.clone())),
        Arc::new(PgFeeBandRepository::new(pool.clone())),
        cache,
    ));

    let cors_origins = config.cors.allowed_origins.clone();
    let bind_addr = config.server_addr();
    let workers = config.server.workers;

    info!(
        "Starting HTTP server on {} with {} workers",
        bind_addr, workers
    );

    // Clone services for closure
    let jwt_service_clone = jwt_service.clone();
    let password_service_clone = password_service.clone();
    let pricing_clone = pricing.clone();

    HttpServer::new(move || {
        // Configure CORS - clone cors_origins for each worker
        let cors_origins_inner = cors_origins.clone();
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _req_head| {
                let origins: Vec<&str> = cors_origins_inner.split(',').collect();
                if let Ok(origin_str) = origin.to_str() {
                    origins.iter().any(|o| o.trim() == origin_str)
                } else {
                    false
                }
            })
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                header::AUTHORIZATION,
                header::ACCEPT,
                header::CONTENT_TYPE,
                header::COOKIE,
            ])
            .supports_credentials()
            .max_age(3600);

        App::new()
            // Add database pool to app data
            .app_data(web::Data::new(pool.clone()))
            // Add auth services
            .app_data(web::Data::new(jwt_service_clone.clone()))
            .app_data(web::Data::new(password_service_clone.clone()))
            // Add pricing service
            .app_data(web::Data::new(pricing_clone.clone()))
            .app_data(web::QueryConfig::default().error_handler(|err, _req| {
                let error_message = err.to_string();
                actix_web::error::InternalError::from_response(
                    err,
                    HttpResponse::BadRequest().json(serde_json::json!({
                        "error": "invalid_query",
                        "message": error_message
                    })),
                )
                .into()
            }))
            // Middleware
            .wrap(cors)
            .wrap(middleware::Logger::new("%a \"%r\" %s %b %Dms"))
            .wrap(middleware::Compress::default())
            .wrap(middleware::NormalizePath::trim())
            // Configure routes
            .configure(configure_routes)
            // Root redirect to health
            .route(
                "/",
                web::get().to(|| async {
                    HttpResponse::Found()
                        .insert_header(("Location", "/api/v1/health"))
                        .finish()
                }),
            )
    })
    .workers(workers)
    .bind(&bind_addr)?
    .run()
    .await
}
