//! DTOs de propietarios
//!
//! La identidad de un propietario viaja siempre como el cuarteto
//! {full_name, email, phone, address}; el email es la clave estable.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::owner::Owner;
use crate::utils::validation::normalize_email;

/// Identidad de propietario tal como la consumen el resolver y el recorder.
/// El email ya viene normalizado a minúsculas.
#[derive(Debug, Clone)]
pub struct OwnerIdentity {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl OwnerIdentity {
    pub fn new(full_name: &str, email: &str, phone: &str, address: &str) -> Self {
        Self {
            full_name: full_name.trim().to_string(),
            email: normalize_email(email),
            phone: phone.trim().to_string(),
            address: address.trim().to_string(),
        }
    }
}

/// Response de propietario para la API
#[derive(Debug, Clone, Serialize)]
pub struct OwnerResponse {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

impl From<Owner> for OwnerResponse {
    fn from(owner: Owner) -> Self {
        Self {
            id: owner.id,
            full_name: owner.full_name,
            email: owner.email,
            phone: owner.phone,
            address: owner.address,
            created_at: owner.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_identity_normalizes_email() {
        let identity = OwnerIdentity::new("John Smith", " John@Example.COM ", "+1234567890", "123 Main St");
        assert_eq!(identity.email, "john@example.com");
        assert_eq!(identity.full_name, "John Smith");
    }
}
