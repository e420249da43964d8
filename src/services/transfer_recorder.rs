//! Registro atómico de transferencias de propiedad
//!
//! Una transferencia es una unidad: resolver al nuevo propietario, anotar
//! el evento inmutable y repuntar el propietario actual del PEV ocurren en
//! la misma transacción o no ocurren, sin dejar atrás ni el Owner creado
//! si la transferencia falla. La serialización entre transferencias
//! concurrentes sobre el mismo PEV se consigue con un check optimista
//! sobre la columna owner_id: el UPDATE exige que el propietario siga
//! siendo el capturado al inicio. Si otra transacción ganó, se revierte y
//! se reintenta (acotado); el reintento relee el nuevo estado, de modo que
//! el previous_owner_id del evento siempre refleja el linaje real.

use crate::dto::owner_dto::OwnerIdentity;
use crate::models::pev::Pev;
use crate::models::transfer::OwnershipTransfer;
use crate::services::owner_resolver::OwnerResolver;
use crate::utils::errors::{not_found_error, AppError, AppResult};
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

/// Reintentos ante conflicto de transferencia concurrente
const MAX_TRANSFER_ATTEMPTS: u32 = 3;

/// Decidir si un intento fallido se reintenta. Solo el conflicto por
/// transferencia concurrente es transitorio; cualquier otro error (PEV
/// inexistente, validación, base de datos) se propaga tal cual, y el
/// conflicto también una vez agotados los intentos.
fn should_retry<T>(result: &AppResult<T>, attempt: u32) -> bool {
    matches!(result, Err(AppError::Conflict(_))) && attempt < MAX_TRANSFER_ATTEMPTS
}

pub struct TransferRecorder {
    pool: PgPool,
    resolver: OwnerResolver,
}

impl TransferRecorder {
    pub fn new(pool: PgPool) -> Self {
        let resolver = OwnerResolver::new(pool.clone());
        Self { pool, resolver }
    }

    /// Transferir la propiedad del PEV al propietario identificado por
    /// `new_owner`. La auto-transferencia (mismo email que el propietario
    /// actual) se permite y queda anotada como cualquier otra.
    pub async fn transfer(
        &self,
        pev_id: Uuid,
        new_owner: &OwnerIdentity,
        transfer_date: NaiveDate,
    ) -> AppResult<OwnershipTransfer> {
        let mut attempt = 1;
        loop {
            let result = self.try_transfer(pev_id, new_owner, transfer_date).await;
            if should_retry(&result, attempt) {
                warn!(
                    "Transferencia de {} en conflicto (intento {}/{}), reintentando",
                    pev_id, attempt, MAX_TRANSFER_ATTEMPTS
                );
                attempt += 1;
                continue;
            }
            return result;
        }
    }

    /// Un intento: cargar el PEV, resolver al nuevo propietario dentro de
    /// la transacción, anotar el evento con el propietario capturado y
    /// repuntar owner_id con check optimista. 0 filas afectadas significa
    /// que otra transferencia ganó la carrera; el rollback deshace también
    /// la resolución del propietario.
    async fn try_transfer(
        &self,
        pev_id: Uuid,
        identity: &OwnerIdentity,
        transfer_date: NaiveDate,
    ) -> AppResult<OwnershipTransfer> {
        let mut tx = self.pool.begin().await?;

        let pev = sqlx::query_as::<_, Pev>("SELECT * FROM pevs WHERE id = $1")
            .bind(pev_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| not_found_error("PEV", &pev_id.to_string()))?;

        let new_owner = self
            .resolver
            .resolve_for_create_within(&mut tx, identity)
            .await?;

        let previous_owner_id = pev.owner_id;
        let now = Utc::now();

        let transfer = sqlx::query_as::<_, OwnershipTransfer>(
            r#"
            INSERT INTO ownership_transfers (id, pev_id, previous_owner_id, new_owner_id, transfer_date, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(pev_id)
        .bind(previous_owner_id)
        .bind(new_owner.id)
        .bind(transfer_date)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        let updated = sqlx::query(
            "UPDATE pevs SET owner_id = $2, updated_at = $3 WHERE id = $1 AND owner_id = $4",
        )
        .bind(pev_id)
        .bind(new_owner.id)
        .bind(now)
        .bind(previous_owner_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(AppError::Conflict(format!(
                "Concurrent transfer detected on PEV '{}'",
                pev_id
            )));
        }

        tx.commit().await?;
        Ok(transfer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conflict() -> AppResult<()> {
        Err(AppError::Conflict("Concurrent transfer detected".to_string()))
    }

    #[test]
    fn test_conflict_retries_below_the_bound() {
        assert!(should_retry(&conflict(), 1));
        assert!(should_retry(&conflict(), MAX_TRANSFER_ATTEMPTS - 1));
    }

    #[test]
    fn test_conflict_surfaces_after_last_attempt() {
        assert!(!should_retry(&conflict(), MAX_TRANSFER_ATTEMPTS));
    }

    #[test]
    fn test_not_found_is_never_retried() {
        let result: AppResult<()> = Err(not_found_error("PEV", "missing"));
        assert!(!should_retry(&result, 1));
    }

    #[test]
    fn test_database_errors_are_never_retried() {
        let result: AppResult<()> = Err(AppError::Database(sqlx::Error::RowNotFound));
        assert!(!should_retry(&result, 1));
    }

    #[test]
    fn test_success_is_never_retried() {
        let result: AppResult<()> = Ok(());
        assert!(!should_retry(&result, 1));
    }
}
