pub mod auth;
pub mod board;
pub mod lead_service;
pub mod optimistic;
pub mod pipeline;
pub mod schema;
pub mod transfer;
