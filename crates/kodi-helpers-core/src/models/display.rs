use serde::{Deserialize, Serialize};

use crate::text::StateText;

/// What kind of media the player is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaType {
    LiveTv,
    Movie,
    TvShow,
    Other,
    NoPlayback,
    /// Kodi could not be reached this cycle.
    Offline,
}

impl MediaType {
    /// Text shown in the media type sensor.
    pub fn label(self, text: &StateText) -> &str {
        match self {
            Self::LiveTv => "Live TV",
            Self::Movie => "Movie",
            Self::TvShow => "TV Show",
            Self::Other => "Other",
            Self::NoPlayback => &text.no_playback,
            Self::Offline => &text.kodi_offline,
        }
    }
}

/// The four display values derived from one poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayState {
    pub media_type: MediaType,
    pub main_info: String,
    pub extra_info: String,
    pub audio_info: String,
}

impl DisplayState {
    /// Nothing is playing (or Kodi reported no usable item).
    pub fn no_playback(text: &StateText) -> Self {
        Self {
            media_type: MediaType::NoPlayback,
            main_info: text.no_playback.clone(),
            extra_info: text.no_playback.clone(),
            audio_info: text.no_audio_info.clone(),
        }
    }

    /// Sentinel for a cycle that failed at the transport.
    pub fn offline(text: &StateText) -> Self {
        Self {
            media_type: MediaType::Offline,
            main_info: text.kodi_offline.clone(),
            extra_info: text.kodi_offline.clone(),
            audio_info: text.kodi_offline.clone(),
        }
    }
}
