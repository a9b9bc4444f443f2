//! Translatable placeholder and audio text.
//!
//! Tables are embedded per language under `translations/{lang}.json`, using
//! the same `{"state": {...}}` layout as the Home Assistant integration.
//! Keys missing from a table keep the built-in (German) wording.

use serde::{Deserialize, Serialize};

const TRANSLATIONS: &[(&str, &str)] = &[
    ("de", include_str!("../translations/de.json")),
    ("en", include_str!("../translations/en.json")),
];

const FALLBACK_LANGUAGE: &str = "en";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateText {
    pub no_playback: String,
    pub no_audio_info: String,
    pub kodi_offline: String,
    pub stereo: String,
    pub channel_5_1: String,
    pub channel_7_1: String,
    /// Template; `{channels}` is replaced by the channel count.
    pub channel_multi: String,
}

impl Default for StateText {
    fn default() -> Self {
        Self {
            no_playback: "Keine Wiedergabe".into(),
            no_audio_info: "Keine Audioinfo".into(),
            kodi_offline: "Kodi offline".into(),
            stereo: "Stereo".into(),
            channel_5_1: "5.1".into(),
            channel_7_1: "7.1".into(),
            channel_multi: "{channels}-Kanal".into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TranslationFile {
    #[serde(default)]
    state: StateText,
}

impl StateText {
    /// Parse a translation file (`{"state": {...}}`).
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let file: TranslationFile = serde_json::from_str(json)?;
        Ok(file.state)
    }

    /// Text for `lang` (`"de"`, `"en-GB"`, ...), falling back to English.
    pub fn for_language(lang: &str) -> Self {
        let primary = lang.split(['-', '_']).next().unwrap_or(lang).to_ascii_lowercase();

        let table = Self::embedded(&primary).or_else(|| {
            tracing::debug!(lang, "no translation table, falling back to English");
            Self::embedded(FALLBACK_LANGUAGE)
        });

        match table.map(Self::from_json) {
            Some(Ok(text)) => text,
            Some(Err(e)) => {
                tracing::warn!(lang, error = %e, "invalid translation table");
                Self::default()
            }
            None => Self::default(),
        }
    }

    /// Languages with an embedded table.
    pub fn languages() -> impl Iterator<Item = &'static str> {
        TRANSLATIONS.iter().map(|(lang, _)| *lang)
    }

    fn embedded(lang: &str) -> Option<&'static str> {
        TRANSLATIONS
            .iter()
            .find(|(l, _)| *l == lang)
            .map(|(_, json)| *json)
    }

    /// Human label for a channel count.
    pub fn channels(&self, count: i64) -> String {
        match count {
            2 => self.stereo.clone(),
            6 => self.channel_5_1.clone(),
            8 => self.channel_7_1.clone(),
            n => self.channel_multi.replace("{channels}", &n.to_string()),
        }
    }
}
