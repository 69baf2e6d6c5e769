//! CRUD handlers for the provider collection.

use axum::{
    extract::{Path, State},
    Json,
};

use crate::app::AppState;
use crate::error::ApiError;
use crate::models::{Provider, ProviderPayload};

/// GET /api/providers
pub async fn list_providers(State(state): State<AppState>) -> Result<Json<Vec<Provider>>, ApiError> {
    let providers = Provider::find_all(&state.db_pool)
        .await
        .map_err(|e| ApiError::Database(e.to_string()))?;
    Ok(Json(providers))
}

/// POST /api/providers
pub async fn create_provider(
    State(state): State<AppState>,
    Json(payload): Json<ProviderPayload>,
) -> Result<Json<Provider>, ApiError> {
    if let Some(message) = payload.validate() {
        return Err(ApiError::Validation(message));
    }

    let provider = Provider::create(&payload, &state.db_pool)
        .await
        .map_err(|e| ApiError::Database(e.to_string()))?;
    tracing::info!(id = provider.id, name = %provider.name, "provider created");
    Ok(Json(provider))
}

/// PUT /api/providers/{id}
pub async fn update_provider(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProviderPayload>,
) -> Result<Json<Provider>, ApiError> {
    if let Some(message) = payload.validate() {
        return Err(ApiError::Validation(message));
    }

    let provider = Provider::update(id, &payload, &state.db_pool)
        .await
        .map_err(|e| ApiError::Database(e.to_string()))?
        .ok_or(ApiError::NotFound(id))?;
    Ok(Json(provider))
}

/// DELETE /api/providers/{id}
pub async fn delete_provider(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = Provider::delete(id, &state.db_pool)
        .await
        .map_err(|e| ApiError::Database(e.to_string()))?;
    if !deleted {
        return Err(ApiError::NotFound(id));
    }
    tracing::info!(id, "provider deleted");
    Ok(Json(serde_json::json!({ "message": "provider deleted" })))
}
