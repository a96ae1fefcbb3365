use std::sync::Arc;

use actix_web::{
    middleware::{DefaultHeaders, Logger},
    web, App, HttpServer,
};
use env_logger::Env;
use log::{debug, info};

use crate::{
    config::{Config, Environment},
    errors::{AppError, Result},
    middleware::{Cors, CorsPolicy},
    routes, services,
    stores::{KeyValueStore, RedisStore},
};

// Setup logging with custom format and configuration
fn setup_logging(config: &Config) -> Result<()> {
    // Configure log level based on environment and config
    let log_level = match config.app.environment {
        Environment::Development => config.app.log_level.clone(),
        Environment::Testing => "debug,actix_web=info".to_string(),
        Environment::Production => "info,actix_web=warn".to_string(),
    };

    let env = Env::default()
        .filter_or("RUST_LOG", log_level)
        .write_style_or("RUST_LOG_STYLE", "always");

    env_logger::try_init_from_env(env)
        .map_err(|e| AppError::Logger(format!("Failed to initialize logger: {}", e)))
}

pub async fn server() -> Result<()> {
    // Load application configuration
    let config = Config::load()?;

    // Setup enhanced logging based on configuration
    setup_logging(&config)?;

    // Log startup information
    info!("Starting {} v{}", config.app.name, config.app.version);
    info!("Environment: {:?}", config.app.environment);
    info!(
        "Binding to {}:{} with {} workers",
        config.server.host, config.server.port, config.server.workers
    );
    if config.shortener.dedup_ttl_sec > 0 {
        info!(
            "Dedup enabled with {}s TTL",
            config.shortener.dedup_ttl_sec
        );
    }

    if config.app.environment == Environment::Development {
        debug!("Debug logging enabled");
        debug!("Full configuration: {:?}", config);
    }

    // One Redis binding backs both logical stores: link records and dedup
    // entries on one side, rate-limit counters on the other
    let store = RedisStore::connect(&config.store.redis_url).await?;
    let links: Arc<dyn KeyValueStore> = Arc::new(store);
    let cache = links.clone();

    // Determine if we should enable more verbose logging
    let enable_debug_logging = config.app.environment != Environment::Production;

    // Determine log format based on environment
    let log_format = if enable_debug_logging {
        "%a \"%r\" %s %b %T \"%{Referer}i\" \"%{User-Agent}i\" %{X-Request-ID}i"
    } else {
        "%a \"%r\" %s %b %T"
    };

    let cors_policy = CorsPolicy::from_config(&config.shortener);

    // Create a cloned config for the closure
    let app_config = config.clone();

    // Start the HTTP server
    HttpServer::new(move || {
        App::new()
            // Make the full configuration available to handlers
            .app_data(web::Data::new(app_config.clone()))
            .configure(|cfg| {
                services::register(links.clone(), cache.clone(), &app_config.shortener, cfg)
            })
            .wrap(Logger::new(log_format))
            // Add request tracking ID
            .wrap(DefaultHeaders::new().add(("X-Request-ID", uuid::Uuid::new_v4().to_string())))
            .wrap(Cors::new(cors_policy.clone()))
            // Configure routes
            .configure(routes::configure_routes)
    })
    .workers(config.server.workers)
    .bind((config.server.host.to_string(), config.server.port))?
    .run()
    .await?;

    Ok(())
}
