//! Controller de transferencias de propiedad

use crate::dto::pev_dto::ApiResponse;
use crate::dto::transfer_dto::{TransferPevRequest, TransferResponse};
use crate::repositories::transfer_repository::TransferRepository;
use crate::services::transfer_recorder::TransferRecorder;
use crate::utils::errors::{AppError, AppResult};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

pub struct TransferController {
    recorder: TransferRecorder,
    transfers: TransferRepository,
}

impl TransferController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            recorder: TransferRecorder::new(pool.clone()),
            transfers: TransferRepository::new(pool),
        }
    }

    pub async fn transfer(
        &self,
        pev_id: Uuid,
        request: TransferPevRequest,
    ) -> AppResult<ApiResponse<TransferResponse>> {
        request.validate()?;

        let transfer = self
            .recorder
            .transfer(pev_id, &request.new_owner_identity(), request.transfer_date)
            .await?;

        let (transfer, previous, new) = self
            .transfers
            .find_with_owners(transfer.id)
            .await?
            .ok_or_else(|| {
                AppError::Internal("Transfer vanished right after creation".to_string())
            })?;

        Ok(ApiResponse::success_with_message(
            TransferResponse::from_parts(transfer, previous, new),
            "Propiedad transferida exitosamente".to_string(),
        ))
    }
}
