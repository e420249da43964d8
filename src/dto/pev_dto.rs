//! DTOs de PEVs
//!
//! Requests de registro/edición (campos planos owner_* + vehículo, como el
//! formulario original), filtros de búsqueda y responses. Las validaciones
//! por campo se acumulan todas juntas vía `validator`.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::owner_dto::{OwnerIdentity, OwnerResponse};
use crate::dto::transfer_dto::TransferResponse;
use crate::models::owner::Owner;
use crate::models::pev::Pev;

/// Tamaño de página fijo para los listados
pub const PAGE_SIZE: i64 = 12;

/// Request para registrar un nuevo PEV (semántica create para el propietario)
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterPevRequest {
    // Datos del propietario
    #[validate(length(max = 255), custom = "crate::utils::validation::validate_not_blank")]
    pub owner_full_name: String,

    #[validate(email, length(max = 255))]
    pub owner_email: String,

    #[validate(length(max = 20), custom = "crate::utils::validation::validate_not_blank")]
    pub owner_phone: String,

    #[validate(custom = "crate::utils::validation::validate_not_blank")]
    pub owner_address: String,

    // Datos del vehículo
    #[validate(length(max = 255), custom = "crate::utils::validation::validate_not_blank")]
    pub make: String,

    #[validate(length(max = 255), custom = "crate::utils::validation::validate_not_blank")]
    pub model: String,

    #[validate(custom = "crate::utils::validation::validate_year")]
    pub year: i32,

    #[validate(custom = "crate::utils::validation::validate_vin")]
    pub vin: String,

    #[validate(custom = "crate::utils::validation::validate_battery_capacity")]
    pub battery_capacity: Decimal,

    #[validate(custom = "crate::utils::validation::validate_past_or_today")]
    pub purchase_date: NaiveDate,

    #[validate(custom = "crate::utils::validation::validate_license_plate")]
    pub license_plate: String,
}

impl RegisterPevRequest {
    pub fn owner_identity(&self) -> OwnerIdentity {
        OwnerIdentity::new(
            &self.owner_full_name,
            &self.owner_email,
            &self.owner_phone,
            &self.owner_address,
        )
    }
}

/// Request para editar un PEV existente (semántica update para el propietario)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdatePevRequest {
    // Datos del propietario
    #[validate(length(max = 255), custom = "crate::utils::validation::validate_not_blank")]
    pub owner_full_name: String,

    #[validate(email, length(max = 255))]
    pub owner_email: String,

    #[validate(length(max = 20), custom = "crate::utils::validation::validate_not_blank")]
    pub owner_phone: String,

    #[validate(custom = "crate::utils::validation::validate_not_blank")]
    pub owner_address: String,

    // Datos del vehículo
    #[validate(length(max = 255), custom = "crate::utils::validation::validate_not_blank")]
    pub make: String,

    #[validate(length(max = 255), custom = "crate::utils::validation::validate_not_blank")]
    pub model: String,

    #[validate(custom = "crate::utils::validation::validate_year")]
    pub year: i32,

    #[validate(custom = "crate::utils::validation::validate_vin")]
    pub vin: String,

    #[validate(custom = "crate::utils::validation::validate_battery_capacity")]
    pub battery_capacity: Decimal,

    #[validate(custom = "crate::utils::validation::validate_past_or_today")]
    pub purchase_date: NaiveDate,

    #[validate(custom = "crate::utils::validation::validate_license_plate")]
    pub license_plate: String,
}

impl UpdatePevRequest {
    pub fn owner_identity(&self) -> OwnerIdentity {
        OwnerIdentity::new(
            &self.owner_full_name,
            &self.owner_email,
            &self.owner_phone,
            &self.owner_address,
        )
    }
}

/// Filtros de búsqueda sobre el registro de PEVs.
/// Los campos ausentes o en blanco no aportan cláusula alguna.
#[derive(Debug, Default, Deserialize)]
pub struct PevSearchFilters {
    pub search: Option<String>,
    pub owner_name: Option<String>,
    pub vin: Option<String>,
    pub make: Option<String>,
    pub model: Option<String>,
    pub license_plate: Option<String>,
    pub page: Option<i64>,
}

impl PevSearchFilters {
    /// Página efectiva, empezando en 1
    pub fn page(&self) -> i64 {
        self.page.filter(|p| *p >= 1).unwrap_or(1)
    }
}

/// Response de PEV con su propietario actual
#[derive(Debug, Serialize)]
pub struct PevResponse {
    pub id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub vin: String,
    pub battery_capacity: Decimal,
    pub purchase_date: NaiveDate,
    pub license_plate: String,
    pub owner: OwnerResponse,
    pub created_at: DateTime<Utc>,
}

impl PevResponse {
    pub fn from_parts(pev: Pev, owner: Owner) -> Self {
        Self {
            id: pev.id,
            make: pev.make,
            model: pev.model,
            year: pev.year,
            vin: pev.vin,
            battery_capacity: pev.battery_capacity,
            purchase_date: pev.purchase_date,
            license_plate: pev.license_plate,
            owner: owner.into(),
            created_at: pev.created_at,
        }
    }
}

/// Response de detalle: PEV + propietario + historial completo de
/// transferencias en orden de creación (la más antigua primero)
#[derive(Debug, Serialize)]
pub struct PevDetailResponse {
    pub id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub vin: String,
    pub battery_capacity: Decimal,
    pub purchase_date: NaiveDate,
    pub license_plate: String,
    pub owner: OwnerResponse,
    pub transfers: Vec<TransferResponse>,
    pub created_at: DateTime<Utc>,
}

impl PevDetailResponse {
    pub fn from_parts(pev: Pev, owner: Owner, transfers: Vec<TransferResponse>) -> Self {
        Self {
            id: pev.id,
            make: pev.make,
            model: pev.model,
            year: pev.year,
            vin: pev.vin,
            battery_capacity: pev.battery_capacity,
            purchase_date: pev.purchase_date,
            license_plate: pev.license_plate,
            owner: owner.into(),
            transfers,
            created_at: pev.created_at,
        }
    }
}

/// Response paginada del listado/búsqueda.
/// `total` cuenta los PEVs que casan con el filtro; `total_count` el registro entero.
#[derive(Debug, Serialize)]
pub struct PaginatedPevsResponse {
    pub data: Vec<PevResponse>,
    pub page: i64,
    pub per_page: i64,
    pub total: i64,
    pub total_count: i64,
}

/// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Duration, Utc};

    fn valid_request() -> RegisterPevRequest {
        RegisterPevRequest {
            owner_full_name: "John Doe".to_string(),
            owner_email: "john@example.com".to_string(),
            owner_phone: "+1234567890".to_string(),
            owner_address: "123 Main St, City".to_string(),
            make: "Tesla".to_string(),
            model: "Model 3".to_string(),
            year: 2023,
            vin: "TESTVIN1234567890".to_string(),
            battery_capacity: Decimal::new(755, 1),
            purchase_date: Utc::now().date_naive() - Duration::days(30),
            license_plate: "EV12345".to_string(),
        }
    }

    #[test]
    fn test_valid_request_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_violations_are_collected_not_short_circuited() {
        let mut request = valid_request();
        request.vin = "SHORT".to_string();
        request.year = Utc::now().year() + 2;
        request.battery_capacity = Decimal::new(100001, 2); // 1000.01
        request.owner_email = "not-an-email".to_string();

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("vin"));
        assert!(fields.contains_key("year"));
        assert!(fields.contains_key("battery_capacity"));
        assert!(fields.contains_key("owner_email"));
    }

    #[test]
    fn test_future_purchase_date_rejected() {
        let mut request = valid_request();
        request.purchase_date = Utc::now().date_naive() + Duration::days(1);
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("purchase_date"));
    }

    #[test]
    fn test_battery_capacity_boundary_accepted() {
        let mut request = valid_request();
        request.battery_capacity = Decimal::from(1000);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_license_plate_length_measured_after_trim() {
        // 10 caracteres más un espacio final: la normalización lo recorta,
        // así que la validación también debe medir el valor recortado
        let mut request = valid_request();
        request.license_plate = "ABCDEFGHIJ ".to_string();
        assert!(request.validate().is_ok());

        let mut request = valid_request();
        request.license_plate = "ABCDEFGHIJK".to_string();
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("license_plate"));
    }

    #[test]
    fn test_page_defaults_to_first() {
        let filters = PevSearchFilters::default();
        assert_eq!(filters.page(), 1);

        let filters = PevSearchFilters {
            page: Some(0),
            ..Default::default()
        };
        assert_eq!(filters.page(), 1);

        let filters = PevSearchFilters {
            page: Some(3),
            ..Default::default()
        };
        assert_eq!(filters.page(), 3);
    }
}
