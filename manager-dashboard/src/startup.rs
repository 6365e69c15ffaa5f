use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::middleware::{
    security_headers::security_headers_middleware, tracing::request_id_middleware,
};
use time::Duration;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

use crate::config::ServerSettings;
use crate::handlers::{
    app::{health_check, index},
    auth::{login_handler, login_page, logout_handler},
    dashboard::{
        begin_refusal, close_view, confirm_accept, dashboard_page, load_pending, open_details,
        open_documents, request_accept, submit_refusal,
    },
    metrics::metrics,
};
use crate::middleware::metrics::metrics_middleware;
use crate::AppState;

const SESSION_IDLE_HOURS: i64 = 8;

pub fn build_router(state: AppState, server: &ServerSettings) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(server.secure_cookies)
        .with_expiry(Expiry::OnInactivity(Duration::hours(SESSION_IDLE_HOURS)));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/login", get(login_page).post(login_handler))
        .route("/logout", post(logout_handler))
        .route("/dashboard", get(dashboard_page))
        .route("/dashboard/pending", get(load_pending))
        .route("/dashboard/refresh", post(load_pending))
        .route("/dashboard/close", post(close_view))
        .route("/enrollments/:id/details", post(open_details))
        .route("/enrollments/:id/documents", post(open_documents))
        .route("/enrollments/:id/accept", post(request_accept))
        .route("/enrollments/:id/accept/confirm", post(confirm_accept))
        .route("/enrollments/:id/refuse", post(begin_refusal))
        .route("/enrollments/:id/refuse/submit", post(submit_refusal))
        .nest_service("/static", ServeDir::new(&server.static_dir))
        .layer(session_layer)
        .layer(from_fn(metrics_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(from_fn(request_id_middleware))
        .layer(from_fn(security_headers_middleware))
        .with_state(state)
}
