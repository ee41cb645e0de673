use std::time::Duration;

use axum::{
    http::{header, Method, StatusCode},
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        health::livez,
        projections::{
            create_projection, delete_projection, delete_projections_by_store_and_week,
            generate_projections, list_projections, projections_by_category,
            projections_by_store, projections_by_week, update_projection,
        },
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    let projection_routes = Router::new()
        .route(
            "/",
            get(list_projections)
                .post(create_projection)
                .put(update_projection),
        )
        .route("/generate", post(generate_projections))
        .route("/store/{store_id}", get(projections_by_store))
        .route("/week/{week}", get(projections_by_week))
        .route("/category/{category}", get(projections_by_category))
        .route(
            "/store/{store_id}/week/{week}",
            delete(delete_projections_by_store_and_week),
        )
        .route(
            "/store/{store_id}/date/{date}/week/{week}",
            delete(delete_projection),
        )
        .layer(cors);

    Router::new()
        .route("/livez", get(livez))
        .nest("/projections", projection_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(10),
        ))
        .with_state(state)
}
