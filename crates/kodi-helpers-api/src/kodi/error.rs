use thiserror::Error;

/// Errors from the Kodi JSON-RPC client.
#[derive(Debug, Error)]
pub enum KodiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON-RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("parse error: {0}")]
    Parse(String),
}

impl KodiError {
    /// Whether the failure happened before Kodi answered at all.
    pub fn is_unreachable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_connect() || e.is_timeout(),
            _ => false,
        }
    }
}
