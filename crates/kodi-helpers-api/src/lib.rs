//! Clients for the Kodi JSON-RPC interface and the OMDb metadata service.

pub mod jsonrpc;
pub mod kodi;
pub mod omdb;
pub mod traits;

pub use kodi::{Connection, KodiClient, KodiError, Scheme};
pub use omdb::{OmdbClient, OmdbError};
pub use traits::{MediaCenter, YearLookup};
