//! Mapping from hosted-store rows to canonical releases.
//!
//! The store keeps snake_case columns (`cover_url`, `audio_url`,
//! `order_index`, one description column per language) and a JSON `links`
//! object written with the web front end's camelCase keys. `into_release`
//! is the only place that knows about either naming.

use std::path::Path;

use serde::Deserialize;

use crate::error::CatalogError;

use super::model::{Catalog, LocalizedText, Release, ReleaseKind, ReleaseLinks, Track};

/// Shown in place of a missing duration label.
const UNKNOWN_DURATION: &str = "-:--";

/// Identifiers and years arrive as either text or numbers depending on the
/// column type chosen by whoever set the table up.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(i64),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LinksRow {
    pub spotify: Option<String>,
    pub apple_music: Option<String>,
    pub yandex_music: Option<String>,
    pub soundcloud: Option<String>,
    pub youtube_music: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackRow {
    pub id: Scalar,
    pub title: String,
    pub audio_url: String,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub order_index: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseRow {
    pub id: Scalar,
    pub title: String,
    pub year: Scalar,
    #[serde(rename = "type")]
    pub kind: ReleaseKind,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub description_en: Option<String>,
    #[serde(default)]
    pub description_ru: Option<String>,
    #[serde(default)]
    pub links: Option<LinksRow>,
    #[serde(default)]
    pub is_upcoming: Option<bool>,
    #[serde(default)]
    pub tracks: Vec<TrackRow>,
}

/// Convert one store row (with its nested track rows) into a `Release`.
pub fn into_release(row: ReleaseRow) -> Release {
    let mut track_rows = row.tracks;
    track_rows.sort_by_key(|t| t.order_index);

    let tracks = track_rows
        .into_iter()
        .map(|t| Track {
            id: t.id.into_string(),
            title: t.title,
            audio_url: t.audio_url,
            duration: t
                .duration
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| UNKNOWN_DURATION.to_string()),
        })
        .collect();

    let links = row.links.unwrap_or_default();

    Release {
        id: row.id.into_string(),
        title: row.title,
        year: row.year.into_string(),
        kind: row.kind,
        description: LocalizedText {
            en: row.description_en.unwrap_or_default(),
            ru: row.description_ru.unwrap_or_default(),
        },
        cover_url: row.cover_url.unwrap_or_default(),
        tracks,
        links: ReleaseLinks {
            spotify: links.spotify,
            apple_music: links.apple_music,
            yandex_music: links.yandex_music,
            soundcloud: links.soundcloud,
            youtube_music: links.youtube_music,
        },
        is_upcoming: row.is_upcoming.unwrap_or(false),
    }
}

/// Parse a JSON array of release rows. Newest releases come first.
pub fn parse_export(json: &str) -> Result<Vec<Release>, CatalogError> {
    let rows: Vec<ReleaseRow> = serde_json::from_str(json)?;
    let mut releases: Vec<Release> = rows.into_iter().map(into_release).collect();
    releases.sort_by(|a, b| b.year.cmp(&a.year));
    Ok(releases)
}

/// Load and validate a store export from disk.
pub fn load_export(path: &Path) -> Result<Catalog, CatalogError> {
    let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Catalog::new(parse_export(&json)?)
}
