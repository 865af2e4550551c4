use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::not_found;
use crate::http::logging::trace_layer;
use axum::Router;
use core_config::server::ServerConfig;
use std::future::{Future, IntoFuture};
use std::io;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Wraps the composed routes with documentation and cross-cutting layers.
///
/// - Swagger UI at `/swagger-ui`, OpenAPI document at `/api-docs/openapi.json`
/// - JSON 404 fallback
/// - request tracing around every route, the fallback included
/// - the given CORS layer
///
/// `apis` should already carry its state and contain every route the service
/// exposes (domain routers, `/health`, `/ready`), so that all of them are
/// logged.
///
/// ```ignore
/// let apis = Router::new()
///     .nest("/users", users_router)
///     .merge(health_router(app_info!()));
///
/// let router = create_router::<ApiDoc>(apis, cors_layer_from_env()?);
/// ```
pub fn create_router<T>(apis: Router, cors: CorsLayer) -> Router
where
    T: OpenApi + 'static,
{
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", T::openapi()))
        .merge(apis)
        .fallback(not_found)
        .layer(trace_layer())
        .layer(cors)
}

/// Binds, serves and shuts down gracefully.
///
/// After SIGINT/SIGTERM the listener stops accepting and in-flight requests
/// get `server_config.shutdown_timeout()` to finish; whatever is still running
/// afterwards is dropped. `cleanup` runs once serving has stopped, bounded by
/// the same timeout.
///
/// Connections carry `ConnectInfo<SocketAddr>` so request logs include the
/// peer address.
///
/// # Errors
/// Fails if the listener cannot bind or the server hits an I/O error.
///
/// ```ignore
/// let cleanup = async move { database::postgres::close(db).await };
/// create_production_app(router, &config.server, cleanup).await?;
/// ```
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    cleanup: F,
) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let shutdown_timeout = server_config.shutdown_timeout();
    let (coordinator, mut shutdown_rx) = ShutdownCoordinator::new();
    let signal_handle = coordinator.clone();

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let serve = axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(async move { signal_handle.wait_for_signal().await })
    .into_future();

    let drain_deadline = async {
        let _ = shutdown_rx.recv().await;
        tokio::time::sleep(shutdown_timeout).await;
    };

    let serve_result = tokio::select! {
        result = serve => result.inspect_err(|e| {
            tracing::error!("Server encountered an error: {:?}", e);
        }),
        _ = drain_deadline => {
            warn!(
                "In-flight requests did not finish within {:?}, forcing shutdown",
                shutdown_timeout
            );
            Ok(())
        }
    };

    info!("Running cleanup (timeout: {:?})", shutdown_timeout);
    if tokio::time::timeout(shutdown_timeout, cleanup).await.is_err() {
        warn!("Cleanup exceeded timeout of {:?}", shutdown_timeout);
    }

    info!("Server stopped");
    serve_result
}
