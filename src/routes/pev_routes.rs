use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::pev_controller::PevController;
use crate::dto::pev_dto::{
    ApiResponse, PaginatedPevsResponse, PevDetailResponse, PevResponse, PevSearchFilters,
    RegisterPevRequest, UpdatePevRequest,
};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_pev_router() -> Router<AppState> {
    Router::new()
        .route("/", post(register_pev))
        .route("/", get(search_pevs))
        .route("/:id", get(get_pev))
        .route("/:id", put(update_pev))
        .route("/:id", delete(delete_pev))
}

async fn register_pev(
    State(state): State<AppState>,
    Json(request): Json<RegisterPevRequest>,
) -> Result<Json<ApiResponse<PevResponse>>, AppError> {
    let controller = PevController::new(state.pool.clone());
    let response = controller.register(request).await?;
    Ok(Json(response))
}

async fn search_pevs(
    State(state): State<AppState>,
    Query(filters): Query<PevSearchFilters>,
) -> Result<Json<PaginatedPevsResponse>, AppError> {
    let controller = PevController::new(state.pool.clone());
    let response = controller.search(filters).await?;
    Ok(Json(response))
}

async fn get_pev(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PevDetailResponse>, AppError> {
    let controller = PevController::new(state.pool.clone());
    let response = controller.get_detail(id).await?;
    Ok(Json(response))
}

async fn update_pev(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePevRequest>,
) -> Result<Json<ApiResponse<PevResponse>>, AppError> {
    let controller = PevController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_pev(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = PevController::new(state.pool.clone());
    controller.delete(id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "PEV eliminado exitosamente"
    })))
}
