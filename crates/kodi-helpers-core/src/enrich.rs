//! Release-year correction.
//!
//! Some scrapers store the air date of the newest episode (or a placeholder
//! far in the future) as the year. When the year lies after the current
//! calendar year, ask a metadata service instead. Failures never block
//! classification.

use chrono::Datelike;
use kodi_helpers_api::kodi::types::{ItemKind, PlaybackItem};
use kodi_helpers_api::traits::{LookupKind, YearLookup};

/// Current calendar year in local time.
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// Whether `item` has a year that needs correcting, and what to look up.
pub fn lookup_target(item: &PlaybackItem, current_year: i32) -> Option<(&str, LookupKind)> {
    let year = item.year?;
    if year <= i64::from(current_year) || item.channel.is_some() {
        return None;
    }

    if item.kind == Some(ItemKind::Episode) || item.tvshowid.is_some() {
        item.showtitle.as_deref().map(|t| (t, LookupKind::Series))
    } else {
        item.title.as_deref().map(|t| (t, LookupKind::Movie))
    }
}

/// Replace an implausible year in place. Returns `true` if it changed.
pub async fn correct_year<L: YearLookup>(
    item: &mut PlaybackItem,
    lookup: &L,
    current_year: i32,
) -> bool {
    let Some((title, kind)) = lookup_target(item, current_year) else {
        return false;
    };

    match lookup.lookup_year(title, kind).await {
        Ok(Some(year)) => {
            tracing::debug!(title, from = ?item.year, to = year, "corrected release year");
            item.year = Some(i64::from(year));
            true
        }
        Ok(None) => {
            tracing::debug!(title, "no release year found");
            false
        }
        Err(e) => {
            tracing::warn!(title, error = %e, "release year lookup failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, thiserror::Error)]
    #[error("lookup unavailable")]
    struct Unavailable;

    struct FakeLookup {
        year: Result<Option<i32>, ()>,
        calls: AtomicUsize,
    }

    impl FakeLookup {
        fn new(year: Result<Option<i32>, ()>) -> Self {
            Self {
                year,
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl YearLookup for FakeLookup {
        type Error = Unavailable;

        async fn lookup_year(&self, _title: &str, _kind: LookupKind) -> Result<Option<i32>, Unavailable> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.year.map_err(|_| Unavailable)
        }
    }

    fn episode(year: i64) -> PlaybackItem {
        PlaybackItem {
            kind: Some(ItemKind::Episode),
            showtitle: Some("Severance".into()),
            title: Some("Good News About Hell".into()),
            year: Some(year),
            ..Default::default()
        }
    }

    #[test]
    fn test_lookup_target() {
        assert_eq!(
            lookup_target(&episode(2031), 2026),
            Some(("Severance", LookupKind::Series))
        );
        assert_eq!(lookup_target(&episode(2026), 2026), None);

        let movie = PlaybackItem {
            kind: Some(ItemKind::Movie),
            title: Some("Dune".into()),
            year: Some(2099),
            ..Default::default()
        };
        assert_eq!(lookup_target(&movie, 2026), Some(("Dune", LookupKind::Movie)));
    }

    #[tokio::test]
    async fn test_future_year_corrected() {
        let lookup = FakeLookup::new(Ok(Some(2022)));
        let mut item = episode(2031);
        assert!(correct_year(&mut item, &lookup, 2026).await);
        assert_eq!(item.year, Some(2022));
    }

    #[tokio::test]
    async fn test_plausible_year_not_looked_up() {
        let lookup = FakeLookup::new(Ok(Some(1999)));
        let mut item = episode(2022);
        assert!(!correct_year(&mut item, &lookup, 2026).await);
        assert_eq!(item.year, Some(2022));
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_lookup_failure_keeps_year() {
        let lookup = FakeLookup::new(Err(()));
        let mut item = episode(2031);
        assert!(!correct_year(&mut item, &lookup, 2026).await);
        assert_eq!(item.year, Some(2031));
    }

    #[tokio::test]
    async fn test_lookup_miss_keeps_year() {
        let lookup = FakeLookup::new(Ok(None));
        let mut item = episode(2031);
        assert!(!correct_year(&mut item, &lookup, 2026).await);
        assert_eq!(item.year, Some(2031));
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
    }
}
