use axum::Router;
use axum_helpers::health_router;
use domain_users::USERS_PATH;

pub mod health;
pub mod users;

/// Creates every route the service exposes: the users API plus `/health`
/// and `/ready`.
///
/// The result is stateless (all sub-routers have their state applied) and is
/// handed to `create_router`, which adds docs and middleware around it.
pub fn routes(state: &crate::state::AppState) -> Router {
    Router::new()
        .nest(USERS_PATH, users::router(state))
        .merge(health_router(state.config.app.clone()))
        .merge(ready_router(state.clone()))
}

/// Creates a router with the /ready endpoint that performs actual health checks.
pub fn ready_router(state: crate::state::AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/ready", get(health::ready_handler))
        .with_state(state)
}
