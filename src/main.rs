use actix_cors::Cors;
use actix_web::{http::header, App, HttpServer};
use anyhow::Context;
use demdem_payouts::config::Config;
use demdem_payouts::middleware::{ApiKeyAuth, RequestId};
use demdem_payouts::{modules, AppState};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "demdem_payouts=debug,actix_web=info".into());
    let registry = tracing_subscriber::registry().with(filter);
    if config.app.log_format.eq_ignore_ascii_case("json") {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting DemDem payouts service");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());
    tracing::info!(
        organizers = config.security.organizer_api_keys.len(),
        fast_track = config.app.fast_track_organizers.len(),
        "API keys loaded"
    );

    let state = AppState::from_config(&config);
    let cors_origin = config.server.cors_allowed_origin.clone();

    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        let cors = (if cors_origin == "*" {
            Cors::default().allow_any_origin()
        } else {
            Cors::default().allowed_origin(&cors_origin)
        })
        .allowed_methods(vec!["GET", "POST"])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .allowed_header("X-API-Key")
        .expose_headers(vec![header::CONTENT_DISPOSITION])
        .max_age(3600);

        let state = state.clone();
        App::new()
            .wrap(ApiKeyAuth::new(state.api_keys.clone()))
            .wrap(cors)
            .wrap(RequestId)
            .wrap(TracingLogger::default())
            .configure(|cfg| state.configure(cfg))
            .configure(modules::configure)
    })
    .workers(config.server.workers)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await.context("Server terminated with an error")
}
