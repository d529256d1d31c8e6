use axum::Router;
use std::sync::Arc;
use std::time::Duration;

use crate::controllers::{health::HealthState, quota::QuotaController, user::UserController};
use crate::domain::auth::JwtVerifier;
use crate::domain::limits::{Clock, UsageLimiter};
use crate::domain::quota::QuotaService;
use crate::domain::user::UserService;
use crate::infrastructure::config::{Config, CounterStoreKind};
use crate::infrastructure::counters::{CounterStore, MemoryCounterStore, PgCounterStore};
use crate::infrastructure::db::DbPool;
use crate::infrastructure::http::create_router;
use crate::infrastructure::repositories::{RoleRepository, UserRepository};

const COUNTER_PURGE_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Counter store selected by configuration. The Postgres store gets a
/// background task deleting expired rows.
pub fn create_counter_store(config: &Config, pool: Arc<DbPool>) -> Arc<dyn CounterStore> {
    match config.counter_store {
        CounterStoreKind::Memory => Arc::new(MemoryCounterStore::new()),
        CounterStoreKind::Postgres => {
            let store = Arc::new(PgCounterStore::new(pool));
            spawn_counter_purge(store.clone(), COUNTER_PURGE_INTERVAL);
            store
        }
    }
}

fn spawn_counter_purge(store: Arc<PgCounterStore>, every: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            match store.purge_expired().await {
                Ok(0) => {}
                Ok(purged) => tracing::debug!(purged, "Expired usage counters purged"),
                Err(e) => tracing::warn!(error = %e, "Failed to purge expired usage counters"),
            }
        }
    });
}

/// Wire repositories, services and controllers into the application router
pub fn build_app(
    pool: Arc<DbPool>,
    config: Arc<Config>,
    counters: Arc<dyn CounterStore>,
    clock: Arc<dyn Clock>,
) -> Router {
    // 1. Instantiate repositories (inject db pool)
    let user_repo = Arc::new(UserRepository::new(pool.clone()));
    let role_repo = Arc::new(RoleRepository::new(pool.clone()));

    // 2. The limiter shared by every service
    let limiter = Arc::new(
        UsageLimiter::new(counters.clone(), clock, config.increment_strategy)
            .with_counter_ttl(Duration::from_secs(config.counter_ttl_secs)),
    );

    // 3. Instantiate services (inject repositories and limiter)
    let user_service = Arc::new(UserService::new(
        user_repo.clone(),
        role_repo,
        limiter.clone(),
    ));
    let quota_service = Arc::new(QuotaService::new(user_repo.clone(), limiter));

    // 4. Instantiate controllers (inject services)
    let user_controller = Arc::new(UserController::new(user_service));
    let quota_controller = Arc::new(QuotaController::new(quota_service));

    let verifier = Arc::new(JwtVerifier::new(&config.jwt_secret));

    create_router(
        HealthState { pool, counters },
        (user_repo, verifier),
        user_controller,
        quota_controller,
    )
}
