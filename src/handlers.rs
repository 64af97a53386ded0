pub mod auth;
pub mod leads;
pub mod setup;
pub mod transfer;
