use once_cell::sync::Lazy;
use sqlx::PgPool;
use std::sync::Arc;
use test_context::AsyncTestContext;
use testcontainers::{clients::Cli, Container};
use testcontainers_modules::postgres::Postgres;
use tokio::net::TcpListener;
use uuid::Uuid;
use voicedesk_backend::app::{build_app, create_counter_store};
use voicedesk_backend::domain::limits::{DayBoundary, IncrementStrategy, SystemClock};
use voicedesk_backend::infrastructure::config::{
    Config, CounterStoreKind, Environment, LogFormat,
};

pub mod api_client;
pub mod db_pool;

use api_client::TestClient;
use db_pool::{DatabasePool, PooledDatabase};
use fixtures::TestFixtures;

// Docker client for test containers
static DOCKER: Lazy<Cli> = Lazy::new(Cli::default);

// Shared PostgreSQL container for all tests
static SHARED_CONTAINER: Lazy<SharedContainer> = Lazy::new(SharedContainer::new);

// Global database pool
static DB_POOL: Lazy<DatabasePool> = Lazy::new(|| DatabasePool::new(SHARED_CONTAINER.port));

/// Shared container that lives for the duration of all tests
struct SharedContainer {
    _container: Container<'static, Postgres>,
    port: u16,
}

impl SharedContainer {
    fn new() -> Self {
        let container = DOCKER.run(Postgres::default());
        let port = container.get_host_port_ipv4(5432);

        println!("🐳 Started shared PostgreSQL container on port {}", port);

        Self {
            _container: container,
            port,
        }
    }
}

pub struct TestContext {
    pub client: TestClient,
    pub pool: PgPool,
    pub config: Config,
    pub fixtures: TestFixtures,
    _db: PooledDatabase,
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        async {
            let pooled_db = DB_POOL
                .get_database()
                .await
                .expect("Failed to get database from pool");

            let config = Config {
                database_url: pooled_db.database_url.clone(),
                host: "127.0.0.1".to_string(),
                port: 0, // Will be assigned by the OS
                jwt_secret: "test-jwt-secret-key-for-testing-only".to_string(),
                environment: Environment::Development,
                log_format: LogFormat::Pretty,
                counter_store: CounterStoreKind::Postgres,
                counter_ttl_secs: 24 * 60 * 60,
                increment_strategy: IncrementStrategy::Atomic,
                day_boundary: DayBoundary::Utc,
            };

            let fixtures = TestFixtures::new(pooled_db.pool.clone());
            fixtures.seed_roles().await.expect("Failed to seed roles");

            let pool = Arc::new(pooled_db.pool.clone());
            let config_ref = Arc::new(config.clone());
            let counters = create_counter_store(&config_ref, pool.clone());
            let clock = Arc::new(SystemClock::new(config.day_boundary));
            let app = build_app(pool, config_ref, counters, clock);

            // Start server
            let listener = TcpListener::bind("127.0.0.1:0")
                .await
                .expect("Failed to bind listener");
            let addr = listener.local_addr().expect("Failed to get local addr");
            let base_url = format!("http://{}", addr);

            tokio::spawn(async move {
                axum::serve(listener, app).await.unwrap();
            });

            // Wait for server to be ready
            tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

            Self {
                client: TestClient::new(&base_url),
                pool: pooled_db.pool.clone(),
                config,
                fixtures,
                _db: pooled_db,
            }
        }
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {
            // Database cleanup happens automatically via Drop on PooledDatabase
        }
    }
}

impl TestContext {
    pub fn token_for(&self, user_id: &Uuid) -> String {
        generate_test_jwt(user_id, &self.config.jwt_secret)
    }

    /// Counter key for today's UTC date
    pub fn counter_key(user_id: &Uuid, action: &str) -> String {
        format!("{}:{}:{}", user_id, action, chrono::Utc::now().date_naive())
    }
}

// Helper to generate valid JWT tokens for testing
pub fn generate_test_jwt(user_id: &Uuid, secret: &str) -> String {
    generate_test_jwt_expiring_in(user_id, secret, chrono::Duration::hours(1))
}

pub fn generate_test_jwt_expiring_in(
    user_id: &Uuid,
    secret: &str,
    expires_in: chrono::Duration,
) -> String {
    use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
    use serde::Serialize;

    #[derive(Serialize)]
    struct Claims {
        sub: String,
        exp: i64,
        iat: i64,
    }

    let now = chrono::Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        exp: (now + expires_in).timestamp(),
        iat: now.timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}
