//! Controller de PEVs
//!
//! Orquesta registro, consulta, edición, borrado y búsqueda. Toda
//! validación y chequeo de unicidad corre antes de cualquier mutación,
//! así un fallo deja el estado intacto.

use crate::dto::pev_dto::{
    ApiResponse, PaginatedPevsResponse, PevDetailResponse, PevResponse, PevSearchFilters,
    RegisterPevRequest, UpdatePevRequest, PAGE_SIZE,
};
use crate::dto::transfer_dto::TransferResponse;
use crate::repositories::pev_repository::PevRepository;
use crate::repositories::transfer_repository::TransferRepository;
use crate::services::owner_resolver::OwnerResolver;
use crate::utils::errors::{AppError, AppResult};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::utils::validation::normalize_plate;

pub struct PevController {
    repository: PevRepository,
    transfers: TransferRepository,
    resolver: OwnerResolver,
}

impl PevController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PevRepository::new(pool.clone()),
            transfers: TransferRepository::new(pool.clone()),
            resolver: OwnerResolver::new(pool),
        }
    }

    /// Registrar un PEV nuevo. Semántica create para el propietario:
    /// un email conocido conserva sus datos actuales.
    pub async fn register(
        &self,
        request: RegisterPevRequest,
    ) -> AppResult<ApiResponse<PevResponse>> {
        request.validate()?;

        let vin = normalize_plate(&request.vin);
        let license_plate = normalize_plate(&request.license_plate);

        if self.repository.vin_exists(&vin, None).await? {
            return Err(AppError::Conflict(
                "Este VIN ya está registrado en otro vehículo".to_string(),
            ));
        }
        if self.repository.license_plate_exists(&license_plate, None).await? {
            return Err(AppError::Conflict(
                "Esta matrícula ya está registrada en otro vehículo".to_string(),
            ));
        }

        let owner = self.resolver.resolve_for_create(&request.owner_identity()).await?;

        let pev = self
            .repository
            .create(
                owner.id,
                request.make.trim(),
                request.model.trim(),
                request.year,
                &vin,
                request.battery_capacity,
                request.purchase_date,
                &license_plate,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            PevResponse::from_parts(pev, owner),
            "PEV registrado exitosamente".to_string(),
        ))
    }

    /// Detalle: PEV + propietario + historial ordenado de transferencias
    pub async fn get_detail(&self, id: Uuid) -> AppResult<PevDetailResponse> {
        let (pev, owner) = self
            .repository
            .find_with_owner(id)
            .await?
            .ok_or_else(|| AppError::NotFound("PEV no encontrado".to_string()))?;

        let transfers = self
            .transfers
            .list_by_pev(id)
            .await?
            .into_iter()
            .map(|(transfer, previous, new)| TransferResponse::from_parts(transfer, previous, new))
            .collect();

        Ok(PevDetailResponse::from_parts(pev, owner, transfers))
    }

    /// Editar un PEV. Semántica update para el propietario: los datos
    /// suministrados sobrescriben los del email. La unicidad de vin y
    /// matrícula excluye al propio registro.
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdatePevRequest,
    ) -> AppResult<ApiResponse<PevResponse>> {
        request.validate()?;

        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("PEV no encontrado".to_string()))?;

        let vin = normalize_plate(&request.vin);
        let license_plate = normalize_plate(&request.license_plate);

        if self.repository.vin_exists(&vin, Some(id)).await? {
            return Err(AppError::Conflict(
                "Este VIN ya está registrado en otro vehículo".to_string(),
            ));
        }
        if self
            .repository
            .license_plate_exists(&license_plate, Some(id))
            .await?
        {
            return Err(AppError::Conflict(
                "Esta matrícula ya está registrada en otro vehículo".to_string(),
            ));
        }

        // Corrección de datos del propietario, no transferencia:
        // no se crea evento alguno.
        let owner = self.resolver.resolve_for_update(&request.owner_identity()).await?;

        let pev = self
            .repository
            .update(
                id,
                owner.id,
                request.make.trim(),
                request.model.trim(),
                request.year,
                &vin,
                request.battery_capacity,
                request.purchase_date,
                &license_plate,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            PevResponse::from_parts(pev, owner),
            "PEV actualizado exitosamente".to_string(),
        ))
    }

    /// Borrar el PEV. El historial de transferencias se conserva.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.repository.delete(id).await
    }

    /// Búsqueda paginada con el total filtrado y el tamaño del registro
    pub async fn search(&self, filters: PevSearchFilters) -> AppResult<PaginatedPevsResponse> {
        let page = filters.page();
        let (results, total) = self.repository.search(&filters).await?;
        let total_count = self.repository.count_all().await?;

        let data = results
            .into_iter()
            .map(|(pev, owner)| PevResponse::from_parts(pev, owner))
            .collect();

        Ok(PaginatedPevsResponse {
            data,
            page,
            per_page: PAGE_SIZE,
            total,
            total_count,
        })
    }
}
