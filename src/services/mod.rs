pub mod owner_resolver;
pub mod transfer_recorder;
