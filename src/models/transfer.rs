//! Modelo de OwnershipTransfer
//!
//! Registro inmutable de un cambio de propietario. La tabla es append-only:
//! ningún código del sistema actualiza ni borra estas filas.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::owner::Owner;

/// OwnershipTransfer principal - mapea exactamente a la tabla ownership_transfers
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct OwnershipTransfer {
    pub id: Uuid,
    pub pev_id: Uuid,
    pub previous_owner_id: Uuid,
    pub new_owner_id: Uuid,
    pub transfer_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fila del join ownership_transfers ⋈ owners (dos veces), con las columnas
/// de ambos propietarios aliasadas.
#[derive(Debug, Clone, FromRow)]
pub struct TransferWithOwnersRow {
    pub id: Uuid,
    pub pev_id: Uuid,
    pub previous_owner_id: Uuid,
    pub new_owner_id: Uuid,
    pub transfer_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub previous_full_name: String,
    pub previous_email: String,
    pub previous_phone: String,
    pub previous_address: String,
    pub previous_created_at: DateTime<Utc>,
    pub previous_updated_at: DateTime<Utc>,
    pub new_full_name: String,
    pub new_email: String,
    pub new_phone: String,
    pub new_address: String,
    pub new_created_at: DateTime<Utc>,
    pub new_updated_at: DateTime<Utc>,
}

impl TransferWithOwnersRow {
    /// Separar la fila plana en (transferencia, propietario anterior, nuevo propietario)
    pub fn split(self) -> (OwnershipTransfer, Owner, Owner) {
        let previous = Owner {
            id: self.previous_owner_id,
            full_name: self.previous_full_name,
            email: self.previous_email,
            phone: self.previous_phone,
            address: self.previous_address,
            created_at: self.previous_created_at,
            updated_at: self.previous_updated_at,
        };
        let new = Owner {
            id: self.new_owner_id,
            full_name: self.new_full_name,
            email: self.new_email,
            phone: self.new_phone,
            address: self.new_address,
            created_at: self.new_created_at,
            updated_at: self.new_updated_at,
        };
        let transfer = OwnershipTransfer {
            id: self.id,
            pev_id: self.pev_id,
            previous_owner_id: self.previous_owner_id,
            new_owner_id: self.new_owner_id,
            transfer_date: self.transfer_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        (transfer, previous, new)
    }
}
