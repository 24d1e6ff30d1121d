mod errors;
mod handlers;
mod middleware;
mod state;

use axum::{
    Router,
    http::{HeaderValue, Method, header::CONTENT_TYPE},
    middleware as axum_middleware,
    routing::get,
};
use tower_http::cors::{AllowOrigin, CorsLayer};

pub use state::HttpState;

pub fn router(state: HttpState) -> Router<()> {
    let api = Router::new()
        .route(
            "/analytics/views/:project_id",
            get(handlers::view_count).post(handlers::record_view),
        )
        .route("/analytics/summary", get(handlers::analytics_summary))
        .route("/reactions", get(handlers::reactions_summary))
        .route("/reactions/:project_id", get(handlers::reactions))
        .route(
            "/reactions/:project_id/:reaction_type",
            axum::routing::post(handlers::add_reaction).delete(handlers::remove_reaction),
        )
        .route("/health", get(handlers::health));

    let cors = cors_layer(&state.allowed_origins);

    Router::new()
        .nest("/api", api)
        .fallback(handlers::not_found)
        .layer(axum_middleware::from_fn(middleware::trace_requests))
        .layer(cors)
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);
    if allowed_origins.is_empty() {
        return layer.allow_origin(AllowOrigin::any());
    }
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}
