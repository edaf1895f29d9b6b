pub mod error;
pub mod routes;
pub mod state;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

pub use state::AppState;

/// Build the axum Router with the trigger and liveness routes.
/// Used by `serve_on()` and available for integration testing.
pub fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::health::liveness))
        .route(
            "/process-tickets",
            get(routes::tickets::process_tickets).post(routes::tickets::process_tickets),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Serve on a pre-bound listener.
///
/// Lets the caller read the actual port before starting (useful when
/// `port = 0` and the OS picks a free port).
pub async fn serve_on(app_state: AppState, listener: tokio::net::TcpListener) -> anyhow::Result<()> {
    let actual_port = listener.local_addr()?.port();
    let app = build_router(app_state);

    tracing::info!("ticket bridge listening on http://localhost:{actual_port}");

    axum::serve(listener, app).await?;
    Ok(())
}
