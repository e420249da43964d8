pub mod pev_routes;
pub mod transfer_routes;
