pub mod owner_dto;
pub mod pev_dto;
pub mod transfer_dto;
