//! Projection endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{Local, NaiveDate};
use serde::Serialize;

use supplycast_core::projection::{
    generate_placeholder_projections, ProjectionKey, SupplyProjection,
};

use crate::{
    handlers::{AppError, NotFound},
    state::AppState,
};

/// Body of a bulk delete response.
#[derive(Debug, Serialize)]
pub struct DeletedCount {
    pub deleted: usize,
}

/// Create a projection (POST /projections).
#[axum::debug_handler]
pub async fn create_projection(
    State(state): State<AppState>,
    Json(projection): Json<SupplyProjection>,
) -> Result<impl IntoResponse, AppError> {
    let stored = state.projections.create_projection(&projection).await?;

    tracing::info!(
        store_id = %stored.store_id,
        week = %stored.week,
        category = %stored.supply_category,
        "Created projection"
    );

    Ok((StatusCode::CREATED, Json(stored)))
}

/// List every projection (GET /projections).
#[axum::debug_handler]
pub async fn list_projections(
    State(state): State<AppState>,
) -> Result<Json<Vec<SupplyProjection>>, AppError> {
    let projections = state.projections.list_projections().await?;
    Ok(Json(projections))
}

/// Projections of a store (GET /projections/store/{store_id}).
#[axum::debug_handler]
pub async fn projections_by_store(
    State(state): State<AppState>,
    Path(store_id): Path<String>,
) -> Result<Json<Vec<SupplyProjection>>, AppError> {
    let projections = state.projections.projections_by_store(&store_id).await?;
    non_empty(projections, || format!("store {store_id}"))
}

/// Projections of a week (GET /projections/week/{week}).
#[axum::debug_handler]
pub async fn projections_by_week(
    State(state): State<AppState>,
    Path(week): Path<String>,
) -> Result<Json<Vec<SupplyProjection>>, AppError> {
    let projections = state.projections.projections_by_week(&week).await?;
    non_empty(projections, || format!("week {week}"))
}

/// Projections of a supply category (GET /projections/category/{category}).
#[axum::debug_handler]
pub async fn projections_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<Json<Vec<SupplyProjection>>, AppError> {
    let projections = state.projections.projections_by_category(&category).await?;
    non_empty(projections, || format!("category {category}"))
}

/// Overwrite a projection, creating it when absent (PUT /projections).
#[axum::debug_handler]
pub async fn update_projection(
    State(state): State<AppState>,
    Json(projection): Json<SupplyProjection>,
) -> Result<Json<SupplyProjection>, AppError> {
    let stored = state.projections.update_projection(&projection).await?;

    tracing::info!(
        store_id = %stored.store_id,
        sort_key = %stored.sort_key(),
        "Updated projection"
    );

    Ok(Json(stored))
}

/// Delete every projection of a store in a week
/// (DELETE /projections/store/{store_id}/week/{week}).
#[axum::debug_handler]
pub async fn delete_projections_by_store_and_week(
    State(state): State<AppState>,
    Path((store_id, week)): Path<(String, String)>,
) -> Result<Json<DeletedCount>, AppError> {
    let deleted = state
        .projections
        .delete_projections_by_store_and_week(&store_id, &week)
        .await?;

    if deleted == 0 {
        return Err(NotFound(format!("store {store_id} in week {week}")).into());
    }

    Ok(Json(DeletedCount { deleted }))
}

/// Delete a single projection
/// (DELETE /projections/store/{store_id}/date/{date}/week/{week}).
#[axum::debug_handler]
pub async fn delete_projection(
    State(state): State<AppState>,
    Path((store_id, projection_date, week)): Path<(String, NaiveDate, String)>,
) -> Result<StatusCode, AppError> {
    let key = ProjectionKey::new(store_id, projection_date, week);

    if !state.projections.delete_projection(&key).await? {
        return Err(NotFound(format!(
            "store {} on {} in week {}",
            key.store_id, key.projection_date, key.week
        ))
        .into());
    }

    tracing::info!(store_id = %key.store_id, sort_key = %key.sort_key(), "Deleted projection");

    Ok(StatusCode::NO_CONTENT)
}

/// Generate placeholder projections and store them (POST /projections/generate).
///
/// Returns every generated record, including those that overwrote an earlier
/// one with the same key.
#[axum::debug_handler]
pub async fn generate_projections(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let today = Local::now().date_naive();
    let projections = generate_placeholder_projections(today);

    for projection in &projections {
        state.projections.create_projection(projection).await?;
    }

    tracing::info!(count = projections.len(), generated_on = %today, "Generated projections");

    Ok((StatusCode::CREATED, Json(projections)))
}

fn non_empty(
    projections: Vec<SupplyProjection>,
    describe: impl FnOnce() -> String,
) -> Result<Json<Vec<SupplyProjection>>, AppError> {
    if projections.is_empty() {
        return Err(NotFound(describe()).into());
    }
    Ok(Json(projections))
}
