use std::time::Duration;

use reqwest::Client;

use super::error::OmdbError;
use super::types::OmdbTitleResponse;
use crate::traits::{LookupKind, YearLookup};

const BASE_URL: &str = "https://www.omdbapi.com";
const TIMEOUT: Duration = Duration::from_secs(5);

/// OMDb (IMDb data) title lookup client.
pub struct OmdbClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OmdbClient {
    pub fn new(api_key: String) -> Result<Self, OmdbError> {
        Self::with_base_url(api_key, BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self, OmdbError> {
        let http = Client::builder().timeout(TIMEOUT).build()?;
        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Fetch the raw title record.
    pub async fn find_title(
        &self,
        title: &str,
        kind: LookupKind,
    ) -> Result<OmdbTitleResponse, OmdbError> {
        let kind = match kind {
            LookupKind::Movie => "movie",
            LookupKind::Series => "series",
        };

        let resp = self
            .http
            .get(format!("{}/", self.base_url))
            .query(&[("apikey", self.api_key.as_str()), ("t", title), ("type", kind)])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status, "OMDb API error");
            return Err(OmdbError::Api {
                status,
                message: body,
            });
        }

        resp.json()
            .await
            .map_err(|e| OmdbError::Parse(e.to_string()))
    }
}

impl YearLookup for OmdbClient {
    type Error = OmdbError;

    async fn lookup_year(&self, title: &str, kind: LookupKind) -> Result<Option<i32>, OmdbError> {
        let record = self.find_title(title, kind).await?;
        if !record.found() {
            tracing::debug!(title, reason = ?record.error, "OMDb has no match");
            return Ok(None);
        }
        Ok(record.release_year())
    }
}
