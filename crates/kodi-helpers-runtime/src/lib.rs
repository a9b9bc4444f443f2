pub mod entities;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::time::MissedTickBehavior;

use kodi_helpers_api::kodi::types::AppProperties;
use kodi_helpers_api::{Connection, KodiClient, MediaCenter, OmdbClient, Scheme, YearLookup};
use kodi_helpers_core::classify::classify;
use kodi_helpers_core::config::AppConfig;
use kodi_helpers_core::enrich;
use kodi_helpers_core::models::DisplayState;
use kodi_helpers_core::text::StateText;

use entities::{DeviceInfo, SensorEntity, SensorKind, SwitchEntity};

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("config error: {0}")]
    Config(String),
    #[error("api error: {0}")]
    Api(String),
}

/// Build a media center client for a connection.
///
/// The scheme switch swaps the client, so the runtime needs to create new ones.
pub trait Connect: MediaCenter + Sized {
    fn connect(connection: &Connection) -> Result<Self, Self::Error>;
}

impl Connect for KodiClient {
    fn connect(connection: &Connection) -> Result<Self, Self::Error> {
        KodiClient::new(connection)
    }
}

/// State of one configured Kodi connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionContext {
    /// Stable prefix for entity unique ids.
    pub entry_id: String,
    pub connection: Connection,
}

impl ConnectionContext {
    pub fn new(connection: Connection) -> Self {
        let slug: String = connection
            .host
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
            .collect();
        Self {
            entry_id: format!("kodi_helpers_{slug}"),
            connection,
        }
    }

    /// Device name used until Kodi reports its own.
    pub fn fallback_device_name(&self) -> String {
        format!("🍿• Kodi-Helper ({})", self.connection.host)
    }
}

/// Result of one poll cycle, rendered for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SensorSnapshot {
    pub state: DisplayState,
    /// `state.media_type` as shown in the media type sensor.
    pub media_type: String,
    pub device_name: String,
    pub app_version: Option<String>,
    /// `false` when the cycle failed at the transport.
    pub available: bool,
    pub updated_at: DateTime<Utc>,
}

impl SensorSnapshot {
    fn new(
        state: DisplayState,
        text: &StateText,
        device_name: String,
        app_version: Option<String>,
        available: bool,
    ) -> Self {
        Self {
            media_type: state.media_type.label(text).to_string(),
            state,
            device_name,
            app_version,
            available,
            updated_at: Utc::now(),
        }
    }

    pub fn value(&self, kind: SensorKind) -> &str {
        match kind {
            SensorKind::MediaType => &self.media_type,
            SensorKind::MainInfo => &self.state.main_info,
            SensorKind::ExtraInfo => &self.state.extra_info,
            SensorKind::AudioInfo => &self.state.audio_info,
        }
    }
}

/// Owns one connection and the latest snapshot; drives poll cycles.
pub struct Runtime<C = KodiClient, L = OmdbClient> {
    context: RwLock<ConnectionContext>,
    client: RwLock<Arc<C>>,
    lookup: Option<L>,
    text: StateText,
    snapshot: Arc<RwLock<SensorSnapshot>>,
}

impl Runtime {
    pub fn new(config: &AppConfig) -> Result<Self, RuntimeError> {
        config
            .validate()
            .map_err(|e| RuntimeError::Config(e.to_string()))?;

        let context = ConnectionContext::new(config.connection());
        let client =
            KodiClient::connect(&context.connection).map_err(|e| RuntimeError::Api(e.to_string()))?;

        let lookup = match config.omdb.api_key() {
            Some(key) if config.omdb.enabled => Some(
                OmdbClient::new(key.to_string()).map_err(|e| RuntimeError::Api(e.to_string()))?,
            ),
            _ => None,
        };

        let text = StateText::for_language(&config.general.language);
        Ok(Self::from_parts(context, client, lookup, text))
    }
}

impl<C: Connect, L: YearLookup> Runtime<C, L> {
    pub fn from_parts(
        context: ConnectionContext,
        client: C,
        lookup: Option<L>,
        text: StateText,
    ) -> Self {
        let initial = SensorSnapshot::new(
            DisplayState::offline(&text),
            &text,
            context.fallback_device_name(),
            None,
            false,
        );
        Self {
            context: RwLock::new(context),
            client: RwLock::new(Arc::new(client)),
            lookup,
            text,
            snapshot: Arc::new(RwLock::new(initial)),
        }
    }

    pub async fn context(&self) -> ConnectionContext {
        self.context.read().await.clone()
    }

    /// The most recent snapshot (offline until the first cycle ran).
    pub async fn snapshot(&self) -> SensorSnapshot {
        self.snapshot.read().await.clone()
    }

    /// Run one fetch+classify cycle and publish its snapshot.
    ///
    /// Any transport failure yields the offline snapshot for this cycle.
    pub async fn run_poll_tick(&self) -> SensorSnapshot {
        let client = self.client.read().await.clone();
        let context = self.context().await;

        let snapshot = match self.poll(client.as_ref(), &context).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::warn!(host = %context.connection.host, error = %e, "Kodi poll failed");
                SensorSnapshot::new(
                    DisplayState::offline(&self.text),
                    &self.text,
                    context.fallback_device_name(),
                    None,
                    false,
                )
            }
        };

        tracing::debug!(
            media_type = %snapshot.media_type,
            main_info = %snapshot.state.main_info,
            extra_info = %snapshot.state.extra_info,
            audio_info = %snapshot.state.audio_info,
            "poll cycle finished"
        );

        *self.snapshot.write().await = snapshot.clone();
        snapshot
    }

    async fn poll(&self, client: &C, context: &ConnectionContext) -> Result<SensorSnapshot, C::Error> {
        let app = client.get_app_properties().await?;
        let (device_name, app_version) = describe_app(&app, context);

        let players = client.get_active_players().await?;
        let Some(player) = players.first() else {
            return Ok(SensorSnapshot::new(
                DisplayState::no_playback(&self.text),
                &self.text,
                device_name,
                app_version,
                true,
            ));
        };

        let (item, audio) = tokio::join!(
            client.get_item(player.player_id),
            client.get_audio_info(player.player_id)
        );
        let mut item = item?;
        let audio = audio?;

        if let Some(lookup) = &self.lookup {
            enrich::correct_year(&mut item, lookup, enrich::current_year()).await;
        }

        let state = classify(Some(&item), Some(&audio), &self.text);
        Ok(SensorSnapshot::new(
            state,
            &self.text,
            device_name,
            app_version,
            true,
        ))
    }

    /// Liveness check. Transport errors count as unreachable.
    pub async fn is_reachable(&self) -> bool {
        let client = self.client.read().await.clone();
        match client.ping().await {
            Ok(pong) => pong,
            Err(e) => {
                tracing::debug!(error = %e, "ping failed");
                false
            }
        }
    }

    pub async fn scheme(&self) -> Scheme {
        self.context.read().await.connection.scheme
    }

    /// Switch the scheme; the next cycle connects with it.
    pub async fn set_scheme(&self, scheme: Scheme) -> Result<(), RuntimeError> {
        let mut context = self.context.write().await;
        if context.connection.scheme == scheme {
            return Ok(());
        }

        let mut connection = context.connection.clone();
        connection.scheme = scheme;
        let client = C::connect(&connection).map_err(|e| RuntimeError::Api(e.to_string()))?;

        *self.client.write().await = Arc::new(client);
        context.connection = connection;
        tracing::info!(host = %context.connection.host, %scheme, "connection scheme changed");
        Ok(())
    }

    pub async fn sensors(&self) -> Vec<SensorEntity> {
        let entry_id = self.context.read().await.entry_id.clone();
        let snapshot = self.snapshot().await;
        SensorKind::ALL
            .iter()
            .map(|kind| SensorEntity::from_snapshot(&entry_id, *kind, &snapshot))
            .collect()
    }

    pub async fn scheme_switch(&self) -> SwitchEntity {
        let context = self.context().await;
        SwitchEntity {
            unique_id: format!("{}_use_https", context.entry_id),
            name: format!("{} - Use HTTPS", context.fallback_device_name()),
            is_on: context.connection.scheme == Scheme::Https,
        }
    }

    pub async fn device_info(&self) -> DeviceInfo {
        let context = self.context().await;
        let snapshot = self.snapshot().await;
        DeviceInfo {
            identifier: context.entry_id.clone(),
            name: snapshot.device_name,
            manufacturer: "Kodi",
            model: "Kodi",
            sw_version: snapshot.app_version,
            configuration_url: context.connection.base_url(),
        }
    }

    /// Poll every `interval` until `shutdown` resolves.
    ///
    /// Each network call is bounded by the client timeout, so a hung Kodi
    /// delays a cycle but never stalls the loop.
    pub async fn run_until<F, S>(&self, interval: Duration, shutdown: S, mut on_snapshot: F)
    where
        F: FnMut(&SensorSnapshot),
        S: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("polling stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let snapshot = self.run_poll_tick().await;
                    on_snapshot(&snapshot);
                }
            }
        }
    }
}

fn describe_app(app: &AppProperties, context: &ConnectionContext) -> (String, Option<String>) {
    let name = app
        .name
        .clone()
        .unwrap_or_else(|| context.fallback_device_name());
    let version = app.version.as_ref().map(|v| v.to_string());
    (name, version)
}
