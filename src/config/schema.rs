use std::path::PathBuf;

use serde::Deserialize;

use crate::i18n::Lang;

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/release-player/config.toml` or
/// `~/.config/release-player/config.toml`
///
/// Precedence (highest wins):
/// 1) Environment variables (prefix `RELEASE_PLAYER__`, `__` as nested separator)
/// 2) Config file (if present)
/// 3) Struct defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub audio: AudioSettings,
    pub ui: UiSettings,
    pub controls: ControlsSettings,
    pub catalog: CatalogSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Fade-out duration when quitting (milliseconds).
    /// Set to 0 to stop immediately.
    pub quit_fade_out_ms: u64,
    /// Whether the player starts muted.
    pub start_muted: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            quit_fade_out_ms: 500,
            start_muted: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiSettings {
    /// Artist credited on every track in the transport bar.
    pub artist_name: String,

    /// Starting interface language (`en` or `ru`). Toggled at runtime with `t`.
    pub language: Lang,

    /// The text rendered inside the top header box.
    pub header_text: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            artist_name: "DANVIR".to_string(),
            language: Lang::default(),
            header_text: " ~ DANVIR // discography ~ ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { scrub_seconds: 5 }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Where releases come from.
    pub source: CatalogSourceSetting,
    /// Catalog file for the `file` and `store-export` sources.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CatalogSourceSetting {
    /// The catalog compiled into the binary.
    #[default]
    Bundled,
    /// A catalog TOML file in the bundled layout.
    #[serde(alias = "toml")]
    File,
    /// A JSON export of the releases/tracks store tables.
    #[serde(alias = "store_export", alias = "json")]
    StoreExport,
}

impl CatalogSourceSetting {
    pub fn name(self) -> &'static str {
        match self {
            Self::Bundled => "bundled",
            Self::File => "file",
            Self::StoreExport => "store-export",
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    /// Default filter directive; `RUST_LOG` wins when set.
    pub level: String,
    /// Log file. Defaults to `$XDG_STATE_HOME/release-player/release-player.log`.
    pub file: Option<PathBuf>,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}
