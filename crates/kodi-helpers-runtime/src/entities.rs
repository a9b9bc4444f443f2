//! Read-only views of a snapshot, shaped like Home Assistant entities.

use serde::Serialize;

use crate::SensorSnapshot;

/// The four string sensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorKind {
    MediaType,
    MainInfo,
    ExtraInfo,
    AudioInfo,
}

impl SensorKind {
    pub const ALL: &[SensorKind] = &[
        Self::MediaType,
        Self::MainInfo,
        Self::ExtraInfo,
        Self::AudioInfo,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::MediaType => "media_type",
            Self::MainInfo => "main_info",
            Self::ExtraInfo => "extra_info",
            Self::AudioInfo => "audio_info",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::MediaType => "Media Type",
            Self::MainInfo => "Playback Main Info",
            Self::ExtraInfo => "Playback Extra Info",
            Self::AudioInfo => "Audio Info",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::MediaType => "mdi:movie-open",
            Self::MainInfo => "mdi:information-outline",
            Self::ExtraInfo => "mdi:information-variant",
            Self::AudioInfo => "mdi:speaker",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SensorEntity {
    pub unique_id: String,
    pub kind: SensorKind,
    pub name: String,
    pub icon: &'static str,
    pub value: String,
    pub available: bool,
}

impl SensorEntity {
    pub fn from_snapshot(entry_id: &str, kind: SensorKind, snapshot: &SensorSnapshot) -> Self {
        Self {
            unique_id: format!("{entry_id}_{}", kind.key()),
            kind,
            name: format!("{} - {}", snapshot.device_name, kind.name()),
            icon: kind.icon(),
            value: snapshot.value(kind).to_string(),
            available: snapshot.available,
        }
    }
}

/// The "Use HTTPS" toggle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwitchEntity {
    pub unique_id: String,
    pub name: String,
    pub is_on: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceInfo {
    pub identifier: String,
    pub name: String,
    pub manufacturer: &'static str,
    pub model: &'static str,
    pub sw_version: Option<String>,
    pub configuration_url: String,
}
