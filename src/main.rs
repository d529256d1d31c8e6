use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voicedesk_backend::app::{build_app, create_counter_store};
use voicedesk_backend::domain::limits::SystemClock;
use voicedesk_backend::infrastructure::config::{Config, CounterStoreKind, LogFormat};
use voicedesk_backend::infrastructure::db::{check_connection, create_pool, run_migrations};
use voicedesk_backend::infrastructure::http::start_http_server;
use voicedesk_backend::infrastructure::repositories::RoleRepository;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting VoiceDesk Backend on {}:{}",
        config.host,
        config.port
    );

    // Create database connection pool
    let pool = create_pool(&config.database_url).await?;
    tracing::info!("Database connection pool created");

    // Verify database connection
    check_connection(&pool).await?;
    tracing::info!("Database connection verified");

    run_migrations(&pool).await?;
    tracing::info!("Database migrations applied");

    let pool = Arc::new(pool);
    let config = Arc::new(config);

    RoleRepository::new(pool.clone()).seed_defaults().await?;

    if config.counter_store == CounterStoreKind::Memory && !config.is_development() {
        tracing::warn!(
            "Usage counters are kept in process memory; run a single instance or set COUNTER_STORE=postgres"
        );
    }

    let counters = create_counter_store(&config, pool.clone());
    let clock = Arc::new(SystemClock::new(config.day_boundary));
    tracing::info!(
        backend = counters.backend_name(),
        strategy = ?config.increment_strategy,
        day_boundary = ?config.day_boundary,
        counter_ttl_secs = config.counter_ttl_secs,
        "Usage limiter configured"
    );

    let app = build_app(pool, config.clone(), counters, clock);

    start_http_server(config, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "voicedesk_backend=debug,tower_http=debug".into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
