//! Canonical catalog shapes: `Track`, `Release` and `Catalog`.
//!
//! Every catalog source converts into these types before anything else in
//! the program sees the data.

use std::collections::HashSet;
use std::time::Duration;

use serde::Deserialize;

use crate::error::CatalogError;
use crate::i18n::Lang;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Track {
    /// Unique within the owning release.
    pub id: String,
    pub title: String,
    pub audio_url: String,
    /// Display label in `m:ss` form. Not derived from the media itself.
    pub duration: String,
}

impl Track {
    /// Parse the display label into a `Duration`.
    ///
    /// Only external protocols that insist on a numeric length use this;
    /// playback progress always comes from the media element.
    pub fn duration_hint(&self) -> Option<Duration> {
        let (mins, secs) = self.duration.trim().split_once(':')?;
        let mins: u64 = mins.parse().ok()?;
        let secs: u64 = secs.parse().ok()?;
        if secs >= 60 {
            return None;
        }
        Some(Duration::from_secs(mins * 60 + secs))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
pub enum ReleaseKind {
    Album,
    #[serde(rename = "EP", alias = "Ep")]
    Ep,
    Single,
}

impl ReleaseKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Album => "Album",
            Self::Ep => "EP",
            Self::Single => "Single",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LocalizedText {
    pub en: String,
    pub ru: String,
}

impl LocalizedText {
    /// Text for `lang`, falling back to the other language when missing.
    pub fn get(&self, lang: Lang) -> &str {
        let (preferred, fallback) = match lang {
            Lang::En => (&self.en, &self.ru),
            Lang::Ru => (&self.ru, &self.en),
        };
        if preferred.trim().is_empty() {
            fallback
        } else {
            preferred
        }
    }
}

/// External platform pages for a release. All optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReleaseLinks {
    pub spotify: Option<String>,
    pub apple_music: Option<String>,
    pub yandex_music: Option<String>,
    pub soundcloud: Option<String>,
    pub youtube_music: Option<String>,
}

impl ReleaseLinks {
    /// Present links as `(platform, url)` pairs in a stable order.
    pub fn entries(&self) -> Vec<(&'static str, &str)> {
        [
            ("Spotify", &self.spotify),
            ("Apple Music", &self.apple_music),
            ("Yandex Music", &self.yandex_music),
            ("SoundCloud", &self.soundcloud),
            ("YouTube Music", &self.youtube_music),
        ]
        .into_iter()
        .filter_map(|(name, url)| url.as_deref().map(|u| (name, u)))
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    pub id: String,
    pub title: String,
    pub year: String,
    #[serde(rename = "type")]
    pub kind: ReleaseKind,
    #[serde(default)]
    pub description: LocalizedText,
    #[serde(default)]
    pub cover_url: String,
    /// Playback and display order.
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub links: ReleaseLinks,
    #[serde(default)]
    pub is_upcoming: bool,
}

impl Release {
    /// Position of the track with `track_id` in this release's order.
    pub fn position_of(&self, track_id: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == track_id)
    }

    pub fn first_track(&self) -> Option<&Track> {
        self.tracks.first()
    }
}

/// Ordered, validated set of releases.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    releases: Vec<Release>,
}

impl Catalog {
    /// Validate `releases` and wrap them in a `Catalog`.
    pub fn new(releases: Vec<Release>) -> Result<Self, CatalogError> {
        let mut release_ids: HashSet<&str> = HashSet::new();
        for release in &releases {
            if !release_ids.insert(release.id.as_str()) {
                return Err(CatalogError::DuplicateRelease(release.id.clone()));
            }
            if release.tracks.is_empty() && !release.is_upcoming {
                return Err(CatalogError::EmptyRelease(release.id.clone()));
            }

            let mut track_ids: HashSet<&str> = HashSet::new();
            for track in &release.tracks {
                if !track_ids.insert(track.id.as_str()) {
                    return Err(CatalogError::DuplicateTrack {
                        release: release.id.clone(),
                        track: track.id.clone(),
                    });
                }
                if track.audio_url.trim().is_empty() {
                    return Err(CatalogError::MissingAudioUrl {
                        release: release.id.clone(),
                        track: track.id.clone(),
                    });
                }
            }
        }

        Ok(Self { releases })
    }

    pub fn releases(&self) -> &[Release] {
        &self.releases
    }

    pub fn get(&self, index: usize) -> Option<&Release> {
        self.releases.get(index)
    }

    /// Resolve a release by id.
    pub fn release(&self, id: &str) -> Option<&Release> {
        self.releases.iter().find(|r| r.id == id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.releases.iter().position(|r| r.id == id)
    }

    pub fn len(&self) -> usize {
        self.releases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.releases.is_empty()
    }
}
