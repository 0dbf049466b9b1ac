//! Main application router.

use crate::{
    controllers::{health_controller, master_data_controller, me_controller, profile_controller},
    middleware::{gate_middleware, logging_middleware, GateState},
    state::AppState,
};
use axum::{
    http::{HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use carelink_config::{AppConfig, ServerConfig};
use carelink_core::HealthCheck;
use carelink_security::TokenProviderInterface;
use carelink_service::{MasterDataService, ProfileAdminService, ProfileCache};
use shaku::{HasComponent, Module};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

/// Creates the main application router from a Shaku module.
pub fn create_router<M>(
    module: &M,
    config: &AppConfig,
    health_checks: Vec<Arc<dyn HealthCheck>>,
) -> Router
where
    M: Module
        + HasComponent<dyn ProfileCache>
        + HasComponent<dyn ProfileAdminService>
        + HasComponent<dyn MasterDataService>
        + HasComponent<dyn TokenProviderInterface>,
{
    let state = health_checks
        .into_iter()
        .fold(AppState::from_module(module), AppState::with_health_check);

    let token_provider: Arc<dyn TokenProviderInterface> = module.resolve();
    let gate = GateState::new(
        token_provider,
        state.profile_cache.clone(),
        config.security.session_cookie_name.as_str(),
    );

    let router = build_router(state, gate, &config.server);
    if config.observability.request_logging {
        router.layer(middleware::from_fn(logging_middleware))
    } else {
        router
    }
}

/// Assembles routes and layers around already-resolved state.
pub fn build_router(state: AppState, gate: GateState, server_config: &ServerConfig) -> Router {
    let superadmin = Router::new()
        .nest("/profiles", profile_controller::router())
        .nest("/master-data", master_data_controller::admin_router());

    let api = Router::new()
        .nest("/master-data", master_data_controller::public_router())
        .nest("/me", me_controller::router())
        .nest("/superadmin", superadmin);

    let router = Router::new()
        .merge(health_controller::router())
        .nest("/api/v1", api)
        .route("/", get(root))
        .with_state(state)
        .layer(middleware::from_fn_with_state(gate, gate_middleware))
        .layer(create_cors_layer(server_config))
        .layer(TraceLayer::new_for_http());

    info!("Router created");
    router
}

/// Creates a CORS layer based on server configuration.
fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if !server_config.cors_enabled {
        return CorsLayer::new();
    }

    if server_config.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = server_config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}

async fn root() -> &'static str {
    "CareLink API v1"
}
