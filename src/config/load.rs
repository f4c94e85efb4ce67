use std::{env, path::PathBuf};

use super::schema::{CatalogSourceSetting, Settings};
use crate::catalog::CatalogSource;
use crate::error::AppError;

const APP_DIR: &str = "release-player";

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `RELEASE_PLAYER__`),
/// then an optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("RELEASE_PLAYER")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.controls.scrub_seconds == 0 {
            return Err("controls.scrub_seconds must be >= 1".to_string());
        }
        if self.ui.artist_name.trim().is_empty() {
            return Err("ui.artist_name must not be empty".to_string());
        }
        if self.catalog.source != CatalogSourceSetting::Bundled && self.catalog.path.is_none() {
            return Err(format!(
                "catalog.source = \"{}\" requires catalog.path",
                self.catalog.source.name()
            ));
        }
        Ok(())
    }

    /// The catalog to load: a path given on the command line wins over the
    /// configured source.
    pub fn catalog_source(&self, cli_path: Option<PathBuf>) -> Result<CatalogSource, AppError> {
        if let Some(path) = cli_path {
            return Ok(CatalogSource::from_path(&path));
        }
        let source = self.catalog.source;
        match (source, self.catalog.path.clone()) {
            (CatalogSourceSetting::Bundled, _) => Ok(CatalogSource::Bundled),
            (CatalogSourceSetting::File, Some(p)) => Ok(CatalogSource::TomlFile(p)),
            (CatalogSourceSetting::StoreExport, Some(p)) => Ok(CatalogSource::StoreExport(p)),
            (_, None) => Err(AppError::MissingCatalogPath(source.name())),
        }
    }
}

/// Resolve the config path from `RELEASE_PLAYER_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("RELEASE_PLAYER_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/release-player/config.toml`
/// or `~/.config/release-player/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    xdg_dir("XDG_CONFIG_HOME", ".config").map(|d| d.join(APP_DIR).join("config.toml"))
}

/// Compute the default log file under `$XDG_STATE_HOME/release-player/` or
/// `~/.local/state/release-player/`.
pub fn default_log_path() -> Option<PathBuf> {
    xdg_dir("XDG_STATE_HOME", ".local/state").map(|d| d.join(APP_DIR).join("release-player.log"))
}

fn xdg_dir(var: &str, home_fallback: &str) -> Option<PathBuf> {
    if let Some(xdg) = env::var_os(var) {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(home_fallback))
    }
}
