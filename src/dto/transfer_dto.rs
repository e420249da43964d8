//! DTOs de transferencias de propiedad

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::owner_dto::{OwnerIdentity, OwnerResponse};
use crate::models::owner::Owner;
use crate::models::transfer::OwnershipTransfer;

/// Request para transferir la propiedad de un PEV
#[derive(Debug, Deserialize, Validate)]
pub struct TransferPevRequest {
    // Datos del nuevo propietario
    #[validate(length(max = 255), custom = "crate::utils::validation::validate_not_blank")]
    pub new_owner_full_name: String,

    #[validate(email, length(max = 255))]
    pub new_owner_email: String,

    #[validate(length(max = 20), custom = "crate::utils::validation::validate_not_blank")]
    pub new_owner_phone: String,

    #[validate(custom = "crate::utils::validation::validate_not_blank")]
    pub new_owner_address: String,

    // Datos de la transferencia
    #[validate(custom = "crate::utils::validation::validate_past_or_today")]
    pub transfer_date: NaiveDate,
}

impl TransferPevRequest {
    pub fn new_owner_identity(&self) -> OwnerIdentity {
        OwnerIdentity::new(
            &self.new_owner_full_name,
            &self.new_owner_email,
            &self.new_owner_phone,
            &self.new_owner_address,
        )
    }
}

/// Response de una transferencia con ambas partes hidratadas
#[derive(Debug, Serialize)]
pub struct TransferResponse {
    pub id: Uuid,
    pub pev_id: Uuid,
    pub previous_owner: OwnerResponse,
    pub new_owner: OwnerResponse,
    pub transfer_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl TransferResponse {
    pub fn from_parts(transfer: OwnershipTransfer, previous: Owner, new: Owner) -> Self {
        Self {
            id: transfer.id,
            pev_id: transfer.pev_id,
            previous_owner: previous.into(),
            new_owner: new.into(),
            transfer_date: transfer.transfer_date,
            created_at: transfer.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn valid_request() -> TransferPevRequest {
        TransferPevRequest {
            new_owner_full_name: "Jane Doe".to_string(),
            new_owner_email: "jane@example.com".to_string(),
            new_owner_phone: "+1987654321".to_string(),
            new_owner_address: "456 Oak Ave".to_string(),
            transfer_date: Utc::now().date_naive(),
        }
    }

    #[test]
    fn test_today_is_a_valid_transfer_date() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_tomorrow_is_rejected() {
        let mut request = valid_request();
        request.transfer_date = Utc::now().date_naive() + Duration::days(1);
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("transfer_date"));
    }

    #[test]
    fn test_blank_owner_fields_rejected_together() {
        let mut request = valid_request();
        request.new_owner_full_name = "   ".to_string();
        request.new_owner_phone = String::new();
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("new_owner_full_name"));
        assert!(fields.contains_key("new_owner_phone"));
    }
}
