pub mod auth;
pub mod interaction;
pub mod lead;
