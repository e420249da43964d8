use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::transfer_controller::TransferController;
use crate::dto::pev_dto::ApiResponse;
use crate::dto::transfer_dto::{TransferPevRequest, TransferResponse};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_transfer_router() -> Router<AppState> {
    Router::new().route("/:id/transfer", post(transfer_ownership))
}

async fn transfer_ownership(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<TransferPevRequest>,
) -> Result<Json<ApiResponse<TransferResponse>>, AppError> {
    let controller = TransferController::new(state.pool.clone());
    let response = controller.transfer(id, request).await?;
    Ok(Json(response))
}
