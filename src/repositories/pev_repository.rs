//! Repositorio de PEVs
//!
//! Incluye el armado de la búsqueda multi-campo: el texto libre forma un
//! grupo OR sobre {nombre del propietario, vin, make, model, matrícula} y
//! se combina con AND con cada filtro por campo presente. El nombre del
//! propietario se resuelve siempre a través del join pevs ⋈ owners.

use crate::dto::pev_dto::{PevSearchFilters, PAGE_SIZE};
use crate::models::owner::Owner;
use crate::models::pev::{Pev, PevWithOwnerRow};
use crate::utils::errors::{conflict_error, is_unique_violation, not_found_error, AppError};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

/// Columnas del join pevs ⋈ owners, con las del propietario aliasadas
const PEV_WITH_OWNER_COLUMNS: &str = "p.id, p.make, p.model, p.year, p.vin, p.battery_capacity, \
     p.purchase_date, p.license_plate, p.owner_id, p.created_at, p.updated_at, \
     o.full_name AS owner_full_name, o.email AS owner_email, o.phone AS owner_phone, \
     o.address AS owner_address, o.created_at AS owner_created_at, o.updated_at AS owner_updated_at";

pub struct PevRepository {
    pool: PgPool,
}

impl PevRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        owner_id: Uuid,
        make: &str,
        model: &str,
        year: i32,
        vin: &str,
        battery_capacity: Decimal,
        purchase_date: NaiveDate,
        license_plate: &str,
    ) -> Result<Pev, AppError> {
        let now = Utc::now();
        let pev = sqlx::query_as::<_, Pev>(
            r#"
            INSERT INTO pevs (id, make, model, year, vin, battery_capacity, purchase_date, license_plate, owner_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(make)
        .bind(model)
        .bind(year)
        .bind(vin)
        .bind(battery_capacity)
        .bind(purchase_date)
        .bind(license_plate)
        .bind(owner_id)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_pev_unique_violation(e, vin, license_plate))?;

        Ok(pev)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Pev>, AppError> {
        let pev = sqlx::query_as::<_, Pev>("SELECT * FROM pevs WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(pev)
    }

    /// Agregado PEV-con-propietario hidratado por join explícito
    pub async fn find_with_owner(&self, id: Uuid) -> Result<Option<(Pev, Owner)>, AppError> {
        let row = sqlx::query_as::<_, PevWithOwnerRow>(&format!(
            "SELECT {} FROM pevs p INNER JOIN owners o ON o.id = p.owner_id WHERE p.id = $1",
            PEV_WITH_OWNER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PevWithOwnerRow::split))
    }

    /// Unicidad del VIN con auto-exclusión del registro en edición
    pub async fn vin_exists(&self, vin: &str, exclude_id: Option<Uuid>) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM pevs WHERE vin = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(vin)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    /// Unicidad de la matrícula con auto-exclusión del registro en edición
    pub async fn license_plate_exists(
        &self,
        license_plate: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM pevs WHERE license_plate = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(license_plate)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    /// Actualización de campos del vehículo. El owner_id se repunta aquí
    /// como corrección del flujo de edición; nunca crea transferencia.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        make: &str,
        model: &str,
        year: i32,
        vin: &str,
        battery_capacity: Decimal,
        purchase_date: NaiveDate,
        license_plate: &str,
    ) -> Result<Pev, AppError> {
        // fetch_optional: el PEV pudo borrarse entre el pre-check del
        // controller y este UPDATE
        let pev = sqlx::query_as::<_, Pev>(
            r#"
            UPDATE pevs
            SET make = $2, model = $3, year = $4, vin = $5, battery_capacity = $6,
                purchase_date = $7, license_plate = $8, owner_id = $9, updated_at = $10
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(make)
        .bind(model)
        .bind(year)
        .bind(vin)
        .bind(battery_capacity)
        .bind(purchase_date)
        .bind(license_plate)
        .bind(owner_id)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_pev_unique_violation(e, vin, license_plate))?;

        pev.ok_or_else(|| not_found_error("PEV", &id.to_string()))
    }

    /// Borrar el PEV. El historial de transferencias no se toca: las filas
    /// de ownership_transfers conservan el pev_id aunque ya no resuelva.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM pevs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found_error("PEV", &id.to_string()));
        }

        Ok(())
    }

    pub async fn count_all(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pevs")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Búsqueda paginada. Devuelve (página de agregados, total filtrado).
    /// Orden: creación más reciente primero.
    pub async fn search(
        &self,
        filters: &PevSearchFilters,
    ) -> Result<(Vec<(Pev, Owner)>, i64), AppError> {
        let mut count_builder = QueryBuilder::new(
            "SELECT COUNT(*) FROM pevs p INNER JOIN owners o ON o.id = p.owner_id",
        );
        push_search_conditions(&mut count_builder, filters);
        let total: i64 = count_builder
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut builder = QueryBuilder::new(format!(
            "SELECT {} FROM pevs p INNER JOIN owners o ON o.id = p.owner_id",
            PEV_WITH_OWNER_COLUMNS
        ));
        push_search_conditions(&mut builder, filters);
        builder.push(" ORDER BY p.created_at DESC LIMIT ");
        builder.push_bind(PAGE_SIZE);
        builder.push(" OFFSET ");
        builder.push_bind((filters.page() - 1) * PAGE_SIZE);

        let rows: Vec<PevWithOwnerRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await?;

        Ok((rows.into_iter().map(PevWithOwnerRow::split).collect(), total))
    }
}

/// Mapear violación de unicidad de pevs al campo culpable
fn map_pev_unique_violation(error: sqlx::Error, vin: &str, license_plate: &str) -> AppError {
    if is_unique_violation(&error) {
        let constraint = match &error {
            sqlx::Error::Database(db_err) => db_err.constraint().unwrap_or("").to_string(),
            _ => String::new(),
        };
        if constraint.contains("license_plate") {
            return conflict_error("PEV", "license_plate", license_plate);
        }
        return conflict_error("PEV", "vin", vin);
    }
    AppError::Database(error)
}

/// Filtro presente y no en blanco (semántica "filled" del formulario)
fn filled(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn like_pattern(term: &str) -> String {
    format!("%{}%", term)
}

/// Componer las cláusulas WHERE de la búsqueda sobre el builder.
/// Los campos ausentes no aportan cláusula; todas las presentes van en AND.
fn push_search_conditions(builder: &mut QueryBuilder<'_, Postgres>, filters: &PevSearchFilters) {
    let mut prefix = " WHERE ";

    if let Some(term) = filled(&filters.search) {
        let pattern = like_pattern(term);
        builder.push(prefix);
        prefix = " AND ";
        builder.push("(o.full_name ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR p.vin ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR p.make ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR p.model ILIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" OR p.license_plate ILIKE ");
        builder.push_bind(pattern);
        builder.push(")");
    }

    if let Some(term) = filled(&filters.owner_name) {
        builder.push(prefix);
        prefix = " AND ";
        builder.push("o.full_name ILIKE ");
        builder.push_bind(like_pattern(term));
    }

    if let Some(term) = filled(&filters.vin) {
        builder.push(prefix);
        prefix = " AND ";
        builder.push("p.vin ILIKE ");
        builder.push_bind(like_pattern(term));
    }

    if let Some(term) = filled(&filters.make) {
        builder.push(prefix);
        prefix = " AND ";
        builder.push("p.make ILIKE ");
        builder.push_bind(like_pattern(term));
    }

    if let Some(term) = filled(&filters.model) {
        builder.push(prefix);
        prefix = " AND ";
        builder.push("p.model ILIKE ");
        builder.push_bind(like_pattern(term));
    }

    if let Some(term) = filled(&filters.license_plate) {
        builder.push(prefix);
        builder.push("p.license_plate ILIKE ");
        builder.push_bind(like_pattern(term));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn composed_sql(filters: &PevSearchFilters) -> String {
        let mut builder: QueryBuilder<'_, Postgres> = QueryBuilder::new("SELECT 1 FROM pevs p");
        push_search_conditions(&mut builder, filters);
        builder.sql().to_string()
    }

    #[test]
    fn test_empty_filters_add_no_clause() {
        let sql = composed_sql(&PevSearchFilters::default());
        assert!(!sql.contains("WHERE"));
    }

    #[test]
    fn test_blank_filters_are_treated_as_absent() {
        let filters = PevSearchFilters {
            search: Some("   ".to_string()),
            make: Some(String::new()),
            ..Default::default()
        };
        assert!(!composed_sql(&filters).contains("WHERE"));
    }

    #[test]
    fn test_free_text_builds_or_group_over_all_fields() {
        let filters = PevSearchFilters {
            search: Some("Tesla".to_string()),
            ..Default::default()
        };
        let sql = composed_sql(&filters);
        assert!(sql.contains("WHERE (o.full_name ILIKE $1"));
        assert!(sql.contains("OR p.vin ILIKE $2"));
        assert!(sql.contains("OR p.make ILIKE $3"));
        assert!(sql.contains("OR p.model ILIKE $4"));
        assert!(sql.contains("OR p.license_plate ILIKE $5)"));
    }

    #[test]
    fn test_field_filters_combine_with_and() {
        let filters = PevSearchFilters {
            make: Some("Tesla".to_string()),
            owner_name: Some("Jane".to_string()),
            ..Default::default()
        };
        let sql = composed_sql(&filters);
        assert!(sql.contains("WHERE o.full_name ILIKE $1"));
        assert!(sql.contains(" AND p.make ILIKE $2"));
    }

    #[test]
    fn test_free_text_is_anded_with_field_filters() {
        let filters = PevSearchFilters {
            search: Some("Tesla".to_string()),
            owner_name: Some("Jane".to_string()),
            ..Default::default()
        };
        let sql = composed_sql(&filters);
        assert!(sql.contains("WHERE (o.full_name ILIKE $1"));
        assert!(sql.contains(") AND o.full_name ILIKE $6"));
    }

    #[test]
    fn test_all_field_filters_chain() {
        let filters = PevSearchFilters {
            owner_name: Some("John".to_string()),
            vin: Some("1HG".to_string()),
            make: Some("Tesla".to_string()),
            model: Some("Model 3".to_string()),
            license_plate: Some("EV".to_string()),
            ..Default::default()
        };
        let sql = composed_sql(&filters);
        assert_eq!(sql.matches(" AND ").count(), 4);
        assert!(sql.contains("p.license_plate ILIKE $5"));
    }

    #[test]
    fn test_like_pattern_wraps_term() {
        assert_eq!(like_pattern("Tesla"), "%Tesla%");
    }
}
