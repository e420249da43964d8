//! Repositorio de propietarios
//!
//! Las búsquedas por email asumen que el llamador ya normalizó el valor a
//! minúsculas (ver `OwnerIdentity`); la columna almacena siempre minúsculas.

use crate::dto::owner_dto::OwnerIdentity;
use crate::models::owner::Owner;
use crate::utils::errors::{conflict_error, is_unique_violation, AppError};
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

pub struct OwnerRepository {
    pool: PgPool,
}

impl OwnerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Owner>, AppError> {
        let owner = sqlx::query_as::<_, Owner>("SELECT * FROM owners WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(owner)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Owner>, AppError> {
        let owner = sqlx::query_as::<_, Owner>("SELECT * FROM owners WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(owner)
    }

    pub async fn create(&self, identity: &OwnerIdentity) -> Result<Owner, AppError> {
        let now = Utc::now();
        let owner = sqlx::query_as::<_, Owner>(
            r#"
            INSERT INTO owners (id, full_name, email, phone, address, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&identity.full_name)
        .bind(&identity.email)
        .bind(&identity.phone)
        .bind(&identity.address)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                conflict_error("Owner", "email", &identity.email)
            } else {
                AppError::Database(e)
            }
        })?;

        Ok(owner)
    }

    /// Sobrescribir nombre/teléfono/dirección del propietario con ese email.
    /// Devuelve None si el email no existe todavía.
    pub async fn update_details(&self, identity: &OwnerIdentity) -> Result<Option<Owner>, AppError> {
        let owner = sqlx::query_as::<_, Owner>(
            r#"
            UPDATE owners
            SET full_name = $2, phone = $3, address = $4, updated_at = $5
            WHERE email = $1
            RETURNING *
            "#,
        )
        .bind(&identity.email)
        .bind(&identity.full_name)
        .bind(&identity.phone)
        .bind(&identity.address)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(owner)
    }
}
