pub mod pev_controller;
pub mod transfer_controller;
