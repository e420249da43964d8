//! Resolución de identidad de propietarios
//!
//! Mapea un email a una identidad estable de propietario. Dos semánticas
//! distintas con nombre propio:
//!
//! - `resolve_for_create` (y su variante `resolve_for_create_within` sobre
//!   una transacción ajena): registro y transferencia. Si el email ya
//!   existe se devuelve tal cual (los datos suministrados se ignoran); si
//!   no, se crea.
//! - `resolve_for_update`: solo el flujo de edición. Si el email existe se
//!   sobrescriben nombre/teléfono/dirección — efecto que alcanza a todos
//!   los vehículos de ese mismo email; si no, se crea.

use crate::dto::owner_dto::OwnerIdentity;
use crate::models::owner::Owner;
use crate::repositories::owner_repository::OwnerRepository;
use crate::utils::errors::{AppError, AppResult};
use chrono::Utc;
use sqlx::{PgConnection, PgPool};
use tracing::debug;
use uuid::Uuid;

/// Una violación de unicidad al crear significa que otra request ganó la
/// carrera de creación: la fila ya existe y basta con releerla.
fn lost_creation_race(error: &AppError) -> bool {
    matches!(error, AppError::Conflict(_))
}

pub struct OwnerResolver {
    repository: OwnerRepository,
}

impl OwnerResolver {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: OwnerRepository::new(pool),
        }
    }

    pub async fn resolve_for_create(&self, identity: &OwnerIdentity) -> AppResult<Owner> {
        if let Some(owner) = self.repository.find_by_email(&identity.email).await? {
            debug!("Propietario existente para email {}", identity.email);
            return Ok(owner);
        }

        self.create_or_refetch(identity).await
    }

    pub async fn resolve_for_update(&self, identity: &OwnerIdentity) -> AppResult<Owner> {
        if let Some(owner) = self.repository.update_details(identity).await? {
            debug!("Propietario actualizado para email {}", identity.email);
            return Ok(owner);
        }

        self.create_or_refetch(identity).await
    }

    /// Semántica de creación sobre una conexión ya abierta, pensada para
    /// ejecutarse dentro de una transacción ajena: el propietario creado
    /// se revierte junto con el resto de la transacción si esta falla.
    /// La carrera de creación se cubre con `ON CONFLICT DO NOTHING` más
    /// relectura, en lugar del catch de conflicto del camino con pool.
    pub async fn resolve_for_create_within(
        &self,
        conn: &mut PgConnection,
        identity: &OwnerIdentity,
    ) -> AppResult<Owner> {
        if let Some(owner) = sqlx::query_as::<_, Owner>("SELECT * FROM owners WHERE email = $1")
            .bind(&identity.email)
            .fetch_optional(&mut *conn)
            .await?
        {
            debug!("Propietario existente para email {}", identity.email);
            return Ok(owner);
        }

        let inserted = sqlx::query_as::<_, Owner>(
            r#"
            INSERT INTO owners (id, full_name, email, phone, address, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            ON CONFLICT (email) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&identity.full_name)
        .bind(&identity.email)
        .bind(&identity.phone)
        .bind(&identity.address)
        .bind(Utc::now())
        .fetch_optional(&mut *conn)
        .await?;

        match inserted {
            Some(owner) => Ok(owner),
            None => {
                debug!(
                    "Carrera de creación perdida para email {}, releyendo",
                    identity.email
                );
                sqlx::query_as::<_, Owner>("SELECT * FROM owners WHERE email = $1")
                    .bind(&identity.email)
                    .fetch_optional(&mut *conn)
                    .await?
                    .ok_or_else(|| vanished_after_race(&identity.email))
            }
        }
    }

    /// Crear el propietario; si perdemos la carrera de creación contra otra
    /// request (violación del UNIQUE de email), la fila ya existe:
    /// se relee en vez de propagar el conflicto.
    async fn create_or_refetch(&self, identity: &OwnerIdentity) -> AppResult<Owner> {
        match self.repository.create(identity).await {
            Ok(owner) => Ok(owner),
            Err(e) if lost_creation_race(&e) => {
                debug!(
                    "Carrera de creación perdida para email {}, releyendo",
                    identity.email
                );
                self.repository
                    .find_by_email(&identity.email)
                    .await?
                    .ok_or_else(|| vanished_after_race(&identity.email))
            }
            Err(e) => Err(e),
        }
    }
}

fn vanished_after_race(email: &str) -> AppError {
    AppError::Internal(format!(
        "Owner with email '{}' vanished after unique violation",
        email
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_violation_is_a_lost_race() {
        let error = AppError::Conflict("Owner with email 'a@b.com' already exists".to_string());
        assert!(lost_creation_race(&error));
    }

    #[test]
    fn test_other_errors_are_not_a_lost_race() {
        assert!(!lost_creation_race(&AppError::NotFound("Owner".to_string())));
        assert!(!lost_creation_race(&AppError::Database(
            sqlx::Error::RowNotFound
        )));
        assert!(!lost_creation_race(&AppError::Internal("boom".to_string())));
    }
}
