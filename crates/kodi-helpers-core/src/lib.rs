pub mod classify;
pub mod config;
pub mod enrich;
pub mod error;
pub mod models;
pub mod text;
