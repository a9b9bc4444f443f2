pub mod client;
pub mod error;
pub mod types;

pub use client::{Connection, KodiClient, Scheme};
pub use error::KodiError;
