//! Route registration: `/ws` upgrade and the `/healthz` liveness probe
//! (SUPPLEMENTED FEATURES #3), mirroring `services/live-table`'s router.

use axum::extract::{State as AxumState, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::connection::{handle_socket, AppState};

async fn ws_handler(ws: WebSocketUpgrade, AxumState(state): AxumState<AppState>) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

async fn healthz() -> &'static str {
    "ok"
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/healthz", get(healthz))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
