pub mod owner_repository;
pub mod pev_repository;
pub mod transfer_repository;
