//! Serve and shutdown sequence.

use crate::di::{build_carelink_module, CacheLayerResolver, DatabaseResolver};
use crate::startup::{print_startup_info, shutdown_signal};
use axum::Router;
use carelink_config::AppConfig;
use carelink_core::{CarelinkError, CarelinkResult, HealthCheck};
use carelink_repository::DatabaseHealth;
use carelink_rest::create_router;
use carelink_service::{BackgroundTasks, CacheHealth};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;

/// Connects, migrates and serves until a shutdown signal arrives.
pub async fn run(config: AppConfig) -> CarelinkResult<()> {
    let module = build_carelink_module(&config).await?;

    let db_pool = module.database_pool();
    db_pool.run_migrations().await?;

    let health_checks: Vec<Arc<dyn HealthCheck>> = vec![
        Arc::new(DatabaseHealth::new(db_pool.clone())),
        Arc::new(CacheHealth::new(
            module.cache_store(),
            config.cache.profile_read_timeout(),
        )),
    ];
    let router = create_router(module.as_ref(), &config, health_checks);

    let addr = config.server.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| CarelinkError::Internal(format!("Failed to bind {}: {}", addr, e)))?;
    print_startup_info(&addr, &config.app.environment);

    serve_on(
        listener,
        router,
        module.background_tasks(),
        config.server.shutdown_grace(),
        shutdown_signal(),
    )
    .await?;

    db_pool.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Serves `router` until `shutdown` resolves.
///
/// The shutdown token is cancelled as soon as the signal arrives, so
/// in-flight cache reads give up while requests drain. Pending cache
/// writes then get `grace` to finish.
pub async fn serve_on<S>(
    listener: TcpListener,
    router: Router,
    tasks: Arc<dyn BackgroundTasks>,
    grace: Duration,
    shutdown: S,
) -> CarelinkResult<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    let token = tasks.shutdown_token();

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            shutdown.await;
            token.cancel();
        })
        .await
        .map_err(|e| CarelinkError::Internal(format!("REST server error: {}", e)))?;

    if tasks.shutdown(grace).await {
        info!("Pending cache writes drained");
    }

    Ok(())
}
