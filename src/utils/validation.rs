//! Utilidades de validación
//!
//! Este módulo contiene las funciones de validación por campo usadas por
//! los derives de `validator` en los DTOs. Cada función devuelve un
//! `ValidationError` con mensaje propio; el derive las acumula todas en un
//! `ValidationErrors` sin cortar en la primera violación.

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use validator::ValidationError;

/// Longitud exacta de un VIN
pub const VIN_LENGTH: usize = 17;

/// Año mínimo de fabricación aceptado
pub const MIN_YEAR: i32 = 2000;

/// Capacidad máxima de batería en kWh (inclusive)
pub const MAX_BATTERY_CAPACITY_KWH: i64 = 1000;

/// Longitud máxima de una matrícula
pub const MAX_LICENSE_PLATE_LENGTH: usize = 10;

/// Validar que el VIN tenga exactamente 17 caracteres (tras recortar espacios)
pub fn validate_vin(value: &str) -> Result<(), ValidationError> {
    if value.trim().chars().count() != VIN_LENGTH {
        let mut error = ValidationError::new("vin");
        error.message = Some("VIN must be exactly 17 characters.".into());
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar el año de fabricación: [2000, año actual + 1]
pub fn validate_year(value: i32) -> Result<(), ValidationError> {
    let max_year = Utc::now().year() + 1;
    if value < MIN_YEAR || value > max_year {
        let mut error = ValidationError::new("year");
        error.message = Some("Manufacturing year must be between 2000 and next year.".into());
        error.add_param("min".into(), &MIN_YEAR);
        error.add_param("max".into(), &max_year);
        error.add_param("actual".into(), &value);
        return Err(error);
    }
    Ok(())
}

/// Validar la capacidad de batería: positiva y como máximo 1000 kWh
pub fn validate_battery_capacity(value: &Decimal) -> Result<(), ValidationError> {
    if *value <= Decimal::ZERO || *value > Decimal::from(MAX_BATTERY_CAPACITY_KWH) {
        let mut error = ValidationError::new("battery_capacity");
        error.message = Some("Battery capacity must be positive and cannot exceed 1000 kWh.".into());
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar la matrícula: no vacía y de 10 caracteres como máximo, medida
/// sobre el valor recortado igual que la normalización que sigue
pub fn validate_license_plate(value: &str) -> Result<(), ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.chars().count() > MAX_LICENSE_PLATE_LENGTH {
        let mut error = ValidationError::new("license_plate");
        error.message = Some("License plate is required and cannot exceed 10 characters.".into());
        error.add_param("max".into(), &MAX_LICENSE_PLATE_LENGTH);
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que una fecha no sea futura (hoy inclusive)
pub fn validate_past_or_today(value: &NaiveDate) -> Result<(), ValidationError> {
    let today = Utc::now().date_naive();
    if *value > today {
        let mut error = ValidationError::new("past_or_today");
        error.message = Some("Date cannot be in the future.".into());
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un string no esté vacío (tras recortar espacios)
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_blank");
        error.message = Some("This field is required.".into());
        return Err(error);
    }
    Ok(())
}

/// Normalizar VIN o matrícula: recortar espacios y pasar a mayúsculas
pub fn normalize_plate(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Normalizar email: recortar espacios y pasar a minúsculas
pub fn normalize_email(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_validate_vin() {
        assert!(validate_vin("1HGCM82633A004352").is_ok());
        assert!(validate_vin(" 1HGCM82633A004352 ").is_ok());
        assert!(validate_vin("SHORTVIN").is_err());
        assert!(validate_vin("1HGCM82633A0043521X").is_err());
    }

    #[test]
    fn test_validate_year_bounds() {
        let current = Utc::now().year();
        assert!(validate_year(2000).is_ok());
        assert!(validate_year(current).is_ok());
        assert!(validate_year(current + 1).is_ok());
        assert!(validate_year(current + 2).is_err());
        assert!(validate_year(1999).is_err());
    }

    #[test]
    fn test_validate_battery_capacity_bounds() {
        assert!(validate_battery_capacity(&Decimal::new(755, 1)).is_ok()); // 75.5
        assert!(validate_battery_capacity(&Decimal::from(1000)).is_ok());
        assert!(validate_battery_capacity(&Decimal::new(100001, 2)).is_err()); // 1000.01
        assert!(validate_battery_capacity(&Decimal::ZERO).is_err());
        assert!(validate_battery_capacity(&Decimal::from(-5)).is_err());
    }

    #[test]
    fn test_validate_license_plate() {
        assert!(validate_license_plate("EV1001").is_ok());
        assert!(validate_license_plate("ABCDEFGHIJ").is_ok());
        // el recorte precede a la medición, igual que en normalize_plate
        assert!(validate_license_plate("ABCDEFGHIJ ").is_ok());
        assert!(validate_license_plate(" ABCDEFGHIJ ").is_ok());
        assert!(validate_license_plate("ABCDEFGHIJK").is_err());
        assert!(validate_license_plate("   ").is_err());
    }

    #[test]
    fn test_validate_past_or_today() {
        let today = Utc::now().date_naive();
        assert!(validate_past_or_today(&today).is_ok());
        assert!(validate_past_or_today(&(today - Duration::days(30))).is_ok());
        assert!(validate_past_or_today(&(today + Duration::days(1))).is_err());
    }

    #[test]
    fn test_validate_not_blank() {
        assert!(validate_not_blank("Tesla").is_ok());
        assert!(validate_not_blank("   ").is_err());
        assert!(validate_not_blank("").is_err());
    }

    #[test]
    fn test_normalize_plate() {
        assert_eq!(normalize_plate(" ev1001 "), "EV1001");
        assert_eq!(normalize_plate("1hgcm82633a004352"), "1HGCM82633A004352");
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email(" John@Example.COM "), "john@example.com");
    }
}
