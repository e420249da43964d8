//! Modelo de Pev
//!
//! Este módulo contiene el struct Pev (Personal Electric Vehicle) y el
//! agregado Pev-con-propietario usado por los listados y la búsqueda.
//! Mapea exactamente al schema PostgreSQL con primary key 'id'.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::owner::Owner;

/// Pev principal - mapea exactamente a la tabla pevs
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Pev {
    pub id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub vin: String,
    pub battery_capacity: Decimal,
    pub purchase_date: NaiveDate,
    pub license_plate: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fila del join pevs ⋈ owners, con las columnas del propietario aliasadas.
/// Se usa un struct plano porque ambas tablas comparten nombres de columna
/// (id, created_at, updated_at).
#[derive(Debug, Clone, FromRow)]
pub struct PevWithOwnerRow {
    pub id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub vin: String,
    pub battery_capacity: Decimal,
    pub purchase_date: NaiveDate,
    pub license_plate: String,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub owner_full_name: String,
    pub owner_email: String,
    pub owner_phone: String,
    pub owner_address: String,
    pub owner_created_at: DateTime<Utc>,
    pub owner_updated_at: DateTime<Utc>,
}

impl PevWithOwnerRow {
    /// Separar la fila plana en el agregado (Pev, Owner)
    pub fn split(self) -> (Pev, Owner) {
        let owner = Owner {
            id: self.owner_id,
            full_name: self.owner_full_name,
            email: self.owner_email,
            phone: self.owner_phone,
            address: self.owner_address,
            created_at: self.owner_created_at,
            updated_at: self.owner_updated_at,
        };
        let pev = Pev {
            id: self.id,
            make: self.make,
            model: self.model,
            year: self.year,
            vin: self.vin,
            battery_capacity: self.battery_capacity,
            purchase_date: self.purchase_date,
            license_plate: self.license_plate,
            owner_id: self.owner_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        (pev, owner)
    }
}
