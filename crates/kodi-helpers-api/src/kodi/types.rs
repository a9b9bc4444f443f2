use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

// ── Lenient field decoding ──────────────────────────────────────
//
// Kodi omits, nulls or mistypes fields depending on the player and the
// media source. A field that does not decode becomes `None` instead of
// failing the whole response.

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let text: Option<String> = lenient(deserializer)?;
    Ok(text.filter(|s| !s.trim().is_empty()))
}

/// Kodi reports `-1` for ids that do not apply (e.g. `tvshowid` of a movie).
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let id: Option<i64> = lenient(deserializer)?;
    Ok(id.filter(|id| *id >= 0))
}

fn lenient_kind<'de, D>(deserializer: D) -> Result<Option<ItemKind>, D::Error>
where
    D: Deserializer<'de>,
{
    let kind: Option<String> = lenient_text(deserializer)?;
    Ok(kind.map(|k| ItemKind::from_kodi(&k)))
}

fn lenient_streams<'de, D>(deserializer: D) -> Result<Vec<AudioStream>, D::Error>
where
    D: Deserializer<'de>,
{
    // Positions must survive decoding: `currentaudiostream.index` points into this list.
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).unwrap_or_default())
            .collect(),
        _ => Vec::new(),
    })
}

fn current_stream_index<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.get("index").and_then(Value::as_i64))
}

// ── Player.GetActivePlayers ─────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ActivePlayer {
    #[serde(rename = "playerid")]
    pub player_id: i64,
    /// `video`, `audio` or `picture`.
    #[serde(rename = "type", default, deserialize_with = "lenient_text")]
    pub kind: Option<String>,
}

// ── Player.GetItem ──────────────────────────────────────────────

/// Fields requested from `Player.GetItem`.
pub const ITEM_PROPERTIES: &[&str] = &[
    "title",
    "showtitle",
    "season",
    "episode",
    "year",
    "tvshowid",
    "file",
    "streamdetails",
    "art",
    "channel",
    "channeltype",
    "label",
];

#[derive(Debug, Deserialize)]
pub struct GetItemResult {
    #[serde(default)]
    pub item: PlaybackItem,
}

/// The item Kodi reports for an active player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PlaybackItem {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub showtitle: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub season: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub episode: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub year: Option<i64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub channel: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub channeltype: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient_kind")]
    pub kind: Option<ItemKind>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub tvshowid: Option<i64>,
}

/// Kodi's item `type`, reduced to what classification distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Movie,
    Episode,
    Other,
}

impl ItemKind {
    pub fn from_kodi(s: &str) -> Self {
        match s {
            "movie" => Self::Movie,
            "episode" => Self::Episode,
            _ => Self::Other,
        }
    }
}

// ── Player.GetProperties (audio) ────────────────────────────────

/// Fields requested from `Player.GetProperties`.
pub const AUDIO_PROPERTIES: &[&str] = &["audiostreams", "currentaudiostream"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AudioStream {
    #[serde(default, deserialize_with = "lenient_text")]
    pub codec: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub channels: Option<i64>,
}

/// All audio tracks of the playing item and which one is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AudioStreams {
    #[serde(rename = "audiostreams", default, deserialize_with = "lenient_streams")]
    pub streams: Vec<AudioStream>,
    #[serde(
        rename = "currentaudiostream",
        default,
        deserialize_with = "current_stream_index"
    )]
    pub current_index: Option<i64>,
}

impl AudioStreams {
    /// The selected stream, if the index points into the list.
    pub fn current(&self) -> Option<&AudioStream> {
        let index = usize::try_from(self.current_index?).ok()?;
        self.streams.get(index)
    }
}

// ── Application.GetProperties ───────────────────────────────────

/// Fields requested from `Application.GetProperties`.
pub const APP_PROPERTIES: &[&str] = &["name", "version"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AppProperties {
    #[serde(default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub version: Option<AppVersion>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AppVersion {
    #[serde(default)]
    pub major: u32,
    #[serde(default)]
    pub minor: u32,
    #[serde(default)]
    pub tag: Option<String>,
}

impl std::fmt::Display for AppVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)?;
        match self.tag.as_deref() {
            Some(tag) if tag != "stable" => write!(f, " ({tag})"),
            _ => Ok(()),
        }
    }
}
