//! Repositorio de transferencias de propiedad (solo lectura)
//!
//! La escritura de transferencias vive exclusivamente en el
//! `TransferRecorder`, que la ejecuta dentro de su transacción atómica.
//! Este repositorio solo hidrata historial.

use crate::models::owner::Owner;
use crate::models::transfer::{OwnershipTransfer, TransferWithOwnersRow};
use crate::utils::errors::AppError;
use sqlx::PgPool;
use uuid::Uuid;

/// Columnas del join ownership_transfers ⋈ owners (prev) ⋈ owners (new)
const TRANSFER_WITH_OWNERS_COLUMNS: &str = "t.id, t.pev_id, t.previous_owner_id, t.new_owner_id, \
     t.transfer_date, t.created_at, t.updated_at, \
     po.full_name AS previous_full_name, po.email AS previous_email, po.phone AS previous_phone, \
     po.address AS previous_address, po.created_at AS previous_created_at, po.updated_at AS previous_updated_at, \
     n.full_name AS new_full_name, n.email AS new_email, n.phone AS new_phone, \
     n.address AS new_address, n.created_at AS new_created_at, n.updated_at AS new_updated_at";

pub struct TransferRepository {
    pool: PgPool,
}

impl TransferRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Historial completo de un PEV en orden de creación (la más antigua
    /// primero), con ambas partes de cada transferencia hidratadas.
    pub async fn list_by_pev(
        &self,
        pev_id: Uuid,
    ) -> Result<Vec<(OwnershipTransfer, Owner, Owner)>, AppError> {
        let rows = sqlx::query_as::<_, TransferWithOwnersRow>(&format!(
            r#"
            SELECT {}
            FROM ownership_transfers t
            INNER JOIN owners po ON po.id = t.previous_owner_id
            INNER JOIN owners n ON n.id = t.new_owner_id
            WHERE t.pev_id = $1
            ORDER BY t.created_at ASC, t.id ASC
            "#,
            TRANSFER_WITH_OWNERS_COLUMNS
        ))
        .bind(pev_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TransferWithOwnersRow::split).collect())
    }

    pub async fn find_with_owners(
        &self,
        id: Uuid,
    ) -> Result<Option<(OwnershipTransfer, Owner, Owner)>, AppError> {
        let row = sqlx::query_as::<_, TransferWithOwnersRow>(&format!(
            r#"
            SELECT {}
            FROM ownership_transfers t
            INNER JOIN owners po ON po.id = t.previous_owner_id
            INNER JOIN owners n ON n.id = t.new_owner_id
            WHERE t.id = $1
            "#,
            TRANSFER_WITH_OWNERS_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(TransferWithOwnersRow::split))
    }
}
