//! Trait definitions for the remote collaborators.
//!
//! The poll coordinator talks to Kodi and to the metadata lookup only through
//! these traits, so it can be driven by fakes in tests.

use std::future::Future;

use crate::kodi::types::{ActivePlayer, AppProperties, AudioStreams, PlaybackItem};

/// The five JSON-RPC calls a poll cycle needs from a Kodi instance.
pub trait MediaCenter: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// `JSONRPC.Ping`. `Ok(true)` only for the canonical `"pong"` answer.
    fn ping(&self) -> impl Future<Output = Result<bool, Self::Error>> + Send;

    /// `Player.GetActivePlayers`, in the order Kodi reports them.
    fn get_active_players(
        &self,
    ) -> impl Future<Output = Result<Vec<ActivePlayer>, Self::Error>> + Send;

    /// `Player.GetItem` for the given player.
    fn get_item(
        &self,
        player_id: i64,
    ) -> impl Future<Output = Result<PlaybackItem, Self::Error>> + Send;

    /// `Player.GetProperties` restricted to the audio stream properties.
    fn get_audio_info(
        &self,
        player_id: i64,
    ) -> impl Future<Output = Result<AudioStreams, Self::Error>> + Send;

    /// `Application.GetProperties` (name and version).
    fn get_app_properties(&self) -> impl Future<Output = Result<AppProperties, Self::Error>> + Send;
}

/// What kind of title a year lookup is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKind {
    Movie,
    Series,
}

/// External release-year lookup used to correct implausible years.
pub trait YearLookup: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Look up the release year of `title`. `Ok(None)` means no match.
    fn lookup_year(
        &self,
        title: &str,
        kind: LookupKind,
    ) -> impl Future<Output = Result<Option<i32>, Self::Error>> + Send;
}
