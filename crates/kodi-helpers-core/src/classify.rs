//! Now-playing classification.
//!
//! Turns the item and audio stream reports of one poll into the four display
//! strings. Pure and total: missing data degrades to placeholders.

use std::sync::LazyLock;

use kodi_helpers_api::kodi::types::{AudioStreams, ItemKind, PlaybackItem};
use regex::Regex;

use crate::models::{DisplayState, MediaType};
use crate::text::StateText;

/// `"<name> S<s>E<e>"` labels of items Kodi could not match to the library.
static RE_LABEL_EPISODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(.*)\sS(\d{1,2})E(\d{1,2})").unwrap());

/// Release tags such as `[1080p]` or `[GER DL]`.
static RE_TAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[[^\]]*\]").unwrap());

/// Kodi reports year 0 when it does not know it.
static RE_NO_YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:\s*\(0\))+\s*$").unwrap());

/// Season and episode both unknown (`-1`).
const UNKNOWN_EPISODE: &str = "S-1E-1";

const LIVE_TV_CHANNEL: &str = "📺 Live TV";
const LIVE_TV_TITLE: &str = "🎬 Live TV";
const MOVIE_EXTRA: &str = "🎬 Film";
const SERIES_EXTRA: &str = "🎞️ Serie";

/// Classify one poll. `item` is `None` when no player is active.
pub fn classify(
    item: Option<&PlaybackItem>,
    audio: Option<&AudioStreams>,
    text: &StateText,
) -> DisplayState {
    let Some(item) = item else {
        return DisplayState::no_playback(text);
    };

    let (media_type, main_info, extra_info) = classify_item(item, text);

    let main_info = clean_main_info(&main_info);
    let main_info = if main_info.is_empty() {
        text.no_playback.clone()
    } else {
        main_info
    };

    DisplayState {
        media_type,
        main_info,
        extra_info: clean_extra_info(extra_info),
        audio_info: describe_audio(audio, text),
    }
}

fn classify_item(item: &PlaybackItem, text: &StateText) -> (MediaType, String, String) {
    if item.title.is_none() {
        if let Some((name, code)) = item.label.as_deref().and_then(parse_episode_label) {
            return (MediaType::TvShow, name, code);
        }
    }

    if item.channeltype.as_deref() == Some("tv") || item.channel.is_some() {
        let channel = item.channel.as_deref().unwrap_or(LIVE_TV_CHANNEL);
        let title = item.title.as_deref().unwrap_or(LIVE_TV_TITLE);
        return (MediaType::LiveTv, channel.to_string(), title.to_string());
    }

    let year = item.year.unwrap_or(0);
    let title = item.title.as_deref().unwrap_or_default();

    if item.kind == Some(ItemKind::Movie) {
        let main = format!("{title} ({year})").trim().to_string();
        return (MediaType::Movie, main, MOVIE_EXTRA.to_string());
    }

    if item.kind == Some(ItemKind::Episode) || item.tvshowid.is_some() {
        let show = item.showtitle.as_deref().unwrap_or_default();
        let main = format!("{show} ({year})").trim().to_string();
        let extra = match (item.season, item.episode) {
            (Some(season), Some(episode)) => {
                format!("{} » {title}", episode_code(season, episode))
            }
            _ => SERIES_EXTRA.to_string(),
        };
        return (MediaType::TvShow, main, extra);
    }

    let main = item
        .label
        .clone()
        .unwrap_or_else(|| text.no_playback.clone());
    (MediaType::Other, main, MediaType::Other.label(text).to_string())
}

/// Split `"Show Name S1E02 ..."` into the show name and `S01E02`.
pub fn parse_episode_label(label: &str) -> Option<(String, String)> {
    let caps = RE_LABEL_EPISODE.captures(label)?;
    let name = caps.get(1)?.as_str().trim();
    if name.is_empty() {
        return None;
    }
    let season: i64 = caps.get(2)?.as_str().parse().ok()?;
    let episode: i64 = caps.get(3)?.as_str().parse().ok()?;
    Some((name.to_string(), episode_code(season, episode)))
}

fn episode_code(season: i64, episode: i64) -> String {
    format!("S{season:02}E{episode:02}")
}

/// Drop `[tags]` and an unknown `(0)` year, then trim. Idempotent.
pub fn clean_main_info(main_info: &str) -> String {
    let no_tags = RE_TAGS.replace_all(main_info, "");
    let no_year = RE_NO_YEAR.replace(&no_tags, "");
    no_year.trim().to_string()
}

fn clean_extra_info(extra_info: String) -> String {
    if extra_info.contains(UNKNOWN_EPISODE) {
        String::new()
    } else {
        extra_info
    }
}

/// `"{codec} {channels}"` for the selected audio stream.
pub fn describe_audio(audio: Option<&AudioStreams>, text: &StateText) -> String {
    let Some(stream) = audio.and_then(AudioStreams::current) else {
        return text.no_audio_info.clone();
    };

    let codec = describe_codec(stream.codec.as_deref().unwrap_or_default());
    let channels = text.channels(stream.channels.unwrap_or(0));
    format!("{codec} {channels}").trim().to_string()
}

pub fn describe_codec(codec: &str) -> String {
    match codec.to_ascii_lowercase().as_str() {
        "ac3" => "Dolby Digital".into(),
        "eac3" => "Dolby Digital+".into(),
        "dts" => "DTS".into(),
        "aac" => "AAC".into(),
        other => other.to_uppercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kodi_helpers_api::kodi::types::AudioStream;

    fn text() -> StateText {
        StateText::default()
    }

    fn movie(title: &str, year: i64) -> PlaybackItem {
        PlaybackItem {
            kind: Some(ItemKind::Movie),
            title: Some(title.into()),
            year: Some(year),
            ..Default::default()
        }
    }

    fn streams(list: &[(&str, i64)], current: Option<i64>) -> AudioStreams {
        AudioStreams {
            streams: list
                .iter()
                .map(|(codec, channels)| AudioStream {
                    codec: Some((*codec).into()),
                    channels: Some(*channels),
                })
                .collect(),
            current_index: current,
        }
    }

    #[test]
    fn test_no_player() {
        let audio = streams(&[("eac3", 6)], Some(0));
        for audio in [None, Some(&audio)] {
            let state = classify(None, audio, &text());
            assert_eq!(state, DisplayState::no_playback(&text()));
            assert_eq!(state.media_type, MediaType::NoPlayback);
            assert_eq!(state.main_info, "Keine Wiedergabe");
            assert_eq!(state.extra_info, "Keine Wiedergabe");
            assert_eq!(state.audio_info, "Keine Audioinfo");
        }
    }

    #[test]
    fn test_movie() {
        let state = classify(Some(&movie("Dune", 2021)), None, &text());
        assert_eq!(state.media_type, MediaType::Movie);
        assert_eq!(state.main_info, "Dune (2021)");
        assert_eq!(state.extra_info, "🎬 Film");
    }

    #[test]
    fn test_movie_unknown_year() {
        let state = classify(Some(&movie("Dune", 0)), None, &text());
        assert_eq!(state.main_info, "Dune");

        let mut item = movie("Dune", 0);
        item.year = None;
        let state = classify(Some(&item), None, &text());
        assert_eq!(state.main_info, "Dune");
    }

    #[test]
    fn test_movie_release_tags() {
        let state = classify(
            Some(&movie("Dune [2160p] [HDR] Part One", 2021)),
            None,
            &text(),
        );
        assert_eq!(state.main_info, "Dune   Part One (2021)");
    }

    #[test]
    fn test_episode() {
        let item = PlaybackItem {
            kind: Some(ItemKind::Episode),
            title: Some("Pilot".into()),
            showtitle: Some("Foo".into()),
            season: Some(1),
            episode: Some(3),
            year: Some(2020),
            tvshowid: Some(7),
            ..Default::default()
        };
        let state = classify(Some(&item), None, &text());
        assert_eq!(state.media_type, MediaType::TvShow);
        assert_eq!(state.main_info, "Foo (2020)");
        assert_eq!(state.extra_info, "S01E03 » Pilot");
    }

    #[test]
    fn test_episode_by_tvshowid_only() {
        let item = PlaybackItem {
            showtitle: Some("Foo".into()),
            tvshowid: Some(7),
            year: Some(2020),
            ..Default::default()
        };
        let state = classify(Some(&item), None, &text());
        assert_eq!(state.media_type, MediaType::TvShow);
        assert_eq!(state.extra_info, "🎞️ Serie");
    }

    #[test]
    fn test_episode_unknown_numbers_blanked() {
        let item = PlaybackItem {
            kind: Some(ItemKind::Episode),
            title: Some("Special".into()),
            showtitle: Some("Foo".into()),
            season: Some(-1),
            episode: Some(-1),
            ..Default::default()
        };
        let state = classify(Some(&item), None, &text());
        assert_eq!(state.main_info, "Foo");
        assert_eq!(state.extra_info, "");
    }

    #[test]
    fn test_label_episode() {
        let item = PlaybackItem {
            label: Some("Foo S2E5 extra".into()),
            ..Default::default()
        };
        let state = classify(Some(&item), None, &text());
        assert_eq!(state.media_type, MediaType::TvShow);
        assert_eq!(state.main_info, "Foo");
        assert_eq!(state.extra_info, "S02E05");
    }

    #[test]
    fn test_label_episode_case_insensitive() {
        assert_eq!(
            parse_episode_label("The Office s09e23"),
            Some(("The Office".into(), "S09E23".into()))
        );
    }

    #[test]
    fn test_label_ignored_when_title_present() {
        let item = PlaybackItem {
            title: Some("Real Title".into()),
            label: Some("Foo S2E5".into()),
            ..Default::default()
        };
        let state = classify(Some(&item), None, &text());
        assert_eq!(state.media_type, MediaType::Other);
        assert_eq!(state.main_info, "Foo S2E5");
    }

    #[test]
    fn test_label_without_name_falls_through() {
        assert_eq!(parse_episode_label(" S01E01"), None);
        let item = PlaybackItem {
            label: Some(" S01E01".into()),
            ..Default::default()
        };
        let state = classify(Some(&item), None, &text());
        assert_eq!(state.media_type, MediaType::Other);
    }

    #[test]
    fn test_live_tv() {
        let item = PlaybackItem {
            channel: Some("Das Erste HD".into()),
            channeltype: Some("tv".into()),
            title: Some("Tagesschau".into()),
            ..Default::default()
        };
        let state = classify(Some(&item), None, &text());
        assert_eq!(state.media_type, MediaType::LiveTv);
        assert_eq!(state.main_info, "Das Erste HD");
        assert_eq!(state.extra_info, "Tagesschau");
    }

    #[test]
    fn test_live_tv_fallbacks() {
        let item = PlaybackItem {
            channeltype: Some("tv".into()),
            ..Default::default()
        };
        let state = classify(Some(&item), None, &text());
        assert_eq!(state.media_type, MediaType::LiveTv);
        assert_eq!(state.main_info, "📺 Live TV");
        assert_eq!(state.extra_info, "🎬 Live TV");
    }

    #[test]
    fn test_live_tv_beats_movie_type() {
        let mut item = movie("Tatort", 2024);
        item.channel = Some("ARD".into());
        let state = classify(Some(&item), None, &text());
        assert_eq!(state.media_type, MediaType::LiveTv);
    }

    #[test]
    fn test_other() {
        let item = PlaybackItem {
            kind: Some(ItemKind::Other),
            title: Some("Bohemian Rhapsody".into()),
            label: Some("Bohemian Rhapsody [Remastered]".into()),
            ..Default::default()
        };
        let state = classify(Some(&item), None, &text());
        assert_eq!(state.media_type, MediaType::Other);
        assert_eq!(state.main_info, "Bohemian Rhapsody");
        assert_eq!(state.extra_info, "Other");
    }

    #[test]
    fn test_empty_item() {
        let state = classify(Some(&PlaybackItem::default()), None, &text());
        assert_eq!(state.media_type, MediaType::Other);
        assert_eq!(state.main_info, "Keine Wiedergabe");
        assert_eq!(state.audio_info, "Keine Audioinfo");
    }

    #[test]
    fn test_tag_only_main_info_uses_placeholder() {
        let item = PlaybackItem {
            label: Some("[FLAC]".into()),
            ..Default::default()
        };
        let state = classify(Some(&item), None, &text());
        assert_eq!(state.main_info, "Keine Wiedergabe");
    }

    #[test]
    fn test_clean_main_info_idempotent() {
        let inputs = [
            "Dune [2160p] (0)",
            "Foo (0) (0)",
            "[a[b]c] Bar",
            "Baz ([x]0)",
            "[[x]] (2020) [tag]",
            "  plain  ",
            "open [bracket",
            "Foo [multi\nline] Bar",
            "",
        ];
        for input in inputs {
            let once = clean_main_info(input);
            assert_eq!(clean_main_info(&once), once, "not idempotent for {input:?}");
            assert!(!RE_TAGS.is_match(&once), "tag left in {once:?}");
        }
        assert_eq!(clean_main_info("Foo (0) (0)"), "Foo");
        assert_eq!(clean_main_info("Baz ([x]0)"), "Baz");
        assert_eq!(clean_main_info("Foo [multi\nline] Bar"), "Foo  Bar");
    }

    #[test]
    fn test_audio_eac3() {
        let audio = streams(&[("eac3", 6)], Some(0));
        assert_eq!(describe_audio(Some(&audio), &text()), "Dolby Digital+ 5.1");
    }

    #[test]
    fn test_audio_table() {
        let cases = [
            ("AC3", 2, "Dolby Digital Stereo"),
            ("dts", 8, "DTS 7.1"),
            ("aac", 2, "AAC Stereo"),
            ("truehd", 8, "TRUEHD 7.1"),
            ("opus", 3, "OPUS 3-Kanal"),
        ];
        for (codec, channels, expected) in cases {
            let audio = streams(&[(codec, channels)], Some(0));
            assert_eq!(describe_audio(Some(&audio), &text()), expected);
        }
    }

    #[test]
    fn test_audio_uses_current_stream() {
        let audio = streams(&[("ac3", 6), ("dts", 8)], Some(1));
        let state = classify(Some(&movie("Dune", 2021)), Some(&audio), &text());
        assert_eq!(state.audio_info, "DTS 7.1");
    }

    #[test]
    fn test_audio_missing() {
        let placeholder = "Keine Audioinfo";
        assert_eq!(describe_audio(None, &text()), placeholder);
        assert_eq!(
            describe_audio(Some(&streams(&[], Some(0))), &text()),
            placeholder
        );
        assert_eq!(
            describe_audio(Some(&streams(&[("aac", 2)], Some(1))), &text()),
            placeholder
        );
        assert_eq!(
            describe_audio(Some(&streams(&[("aac", 2)], None)), &text()),
            placeholder
        );
        assert_eq!(
            describe_audio(Some(&streams(&[("aac", 2)], Some(-1))), &text()),
            placeholder
        );
    }

    #[test]
    fn test_english_text() {
        let text = StateText::for_language("en");
        let state = classify(None, None, &text);
        assert_eq!(state.main_info, "No playback");
        assert_eq!(state.audio_info, "No audio info");
    }
}
