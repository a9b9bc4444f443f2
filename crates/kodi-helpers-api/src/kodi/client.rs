use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::error::KodiError;
use super::types::{
    ActivePlayer, AppProperties, AudioStreams, GetItemResult, PlaybackItem, APP_PROPERTIES,
    AUDIO_PROPERTIES, ITEM_PROPERTIES,
};
use crate::jsonrpc::{Request, Response};
use crate::traits::MediaCenter;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Transport used to reach the JSON-RPC endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Scheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            other => Err(format!("unknown scheme '{other}' (expected http or https)")),
        }
    }
}

/// Everything needed to reach one Kodi instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub scheme: Scheme,
    pub timeout: Duration,
}

impl Connection {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            username: None,
            password: None,
            scheme: Scheme::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// `{scheme}://{host}:{port}`, the address shown to users.
    pub fn base_url(&self) -> String {
        format!("{}://{}:{}", self.scheme, self.host, self.port)
    }

    pub fn endpoint(&self) -> String {
        format!("{}/jsonrpc", self.base_url())
    }
}

/// Kodi JSON-RPC client over HTTP(S).
pub struct KodiClient {
    endpoint: String,
    username: Option<String>,
    password: Option<String>,
    http: Client,
}

impl KodiClient {
    pub fn new(connection: &Connection) -> Result<Self, KodiError> {
        let http = Client::builder().timeout(connection.timeout).build()?;
        Ok(Self::with_client(connection, http))
    }

    /// Use a preconfigured reqwest client (shared pools, custom TLS).
    pub fn with_client(connection: &Connection, http: Client) -> Self {
        Self {
            endpoint: connection.endpoint(),
            username: connection.username.clone().filter(|u| !u.is_empty()),
            password: connection.password.clone(),
            http,
        }
    }

    /// POST one JSON-RPC call and return its `result` member.
    async fn call(&self, method: &str, params: Option<Value>) -> Result<Value, KodiError> {
        tracing::debug!(method, endpoint = %self.endpoint, "Kodi request");

        let mut request = self.http.post(&self.endpoint).json(&Request::new(method, params));
        if let Some(username) = &self.username {
            request = request.basic_auth(username, self.password.as_deref());
        }

        let resp = Self::check_response(request.send().await?).await?;
        let body: Response = resp
            .json()
            .await
            .map_err(|e| KodiError::Parse(e.to_string()))?;

        if let Some(error) = body.error {
            tracing::warn!(method, code = error.code, message = %error.message, "Kodi RPC error");
            return Err(KodiError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        body.result
            .ok_or_else(|| KodiError::Parse(format!("{method}: response has no result")))
    }

    async fn call_as<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Option<Value>,
    ) -> Result<T, KodiError> {
        let result = self.call(method, params).await?;
        serde_json::from_value(result).map_err(|e| KodiError::Parse(format!("{method}: {e}")))
    }

    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, KodiError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            tracing::warn!(status, "Kodi API error");
            Err(KodiError::Api {
                status,
                message: body,
            })
        }
    }
}

impl MediaCenter for KodiClient {
    type Error = KodiError;

    async fn ping(&self) -> Result<bool, KodiError> {
        let result = self.call("JSONRPC.Ping", None).await?;
        Ok(result.as_str() == Some("pong"))
    }

    async fn get_active_players(&self) -> Result<Vec<ActivePlayer>, KodiError> {
        self.call_as("Player.GetActivePlayers", None).await
    }

    async fn get_item(&self, player_id: i64) -> Result<PlaybackItem, KodiError> {
        let result: GetItemResult = self
            .call_as(
                "Player.GetItem",
                Some(json!({ "playerid": player_id, "properties": ITEM_PROPERTIES })),
            )
            .await?;
        Ok(result.item)
    }

    async fn get_audio_info(&self, player_id: i64) -> Result<AudioStreams, KodiError> {
        self.call_as(
            "Player.GetProperties",
            Some(json!({ "playerid": player_id, "properties": AUDIO_PROPERTIES })),
        )
        .await
    }

    async fn get_app_properties(&self) -> Result<AppProperties, KodiError> {
        self.call_as(
            "Application.GetProperties",
            Some(json!({ "properties": APP_PROPERTIES })),
        )
        .await
    }
}
