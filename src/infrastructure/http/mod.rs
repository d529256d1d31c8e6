use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::controllers::{
    health::{self, HealthState},
    quota::QuotaController,
    user::UserController,
};
use crate::infrastructure::auth::{auth_middleware, request_id_middleware, AuthState};
use crate::infrastructure::config::Config;

/// Build the router with every route configured
pub fn create_router(
    health_state: HealthState,
    auth_state: AuthState,
    user_controller: Arc<UserController>,
    quota_controller: Arc<QuotaController>,
) -> Router {
    // Quota routes (require authentication)
    let quota_routes = Router::new()
        .route("/api/submissions/check", post(QuotaController::check_submission))
        .route("/api/stt/authorize", post(QuotaController::authorize_transcription))
        .route("/api/tts/authorize", post(QuotaController::authorize_synthesis))
        .route("/api/usage", get(QuotaController::get_usage))
        .with_state(quota_controller)
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ));

    // User routes (require authentication)
    let user_routes = Router::new()
        .route("/api/me", get(UserController::get_me))
        .route("/api/me/role", put(UserController::change_role))
        .route(
            "/api/admin/users/:userId/superuser",
            post(UserController::grant_superuser),
        )
        .with_state(user_controller.clone())
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware));

    // Role catalogue (public)
    let role_routes = Router::new()
        .route("/api/roles", get(UserController::list_roles))
        .with_state(user_controller);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(health_state)
        .merge(role_routes)
        .merge(user_routes)
        .merge(quota_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_id_middleware)),
        )
}

/// Start the HTTP server on the configured address
pub async fn start_http_server(
    config: Arc<Config>,
    app: Router,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
