//! Resource loading for the media thread.
//!
//! A track's `audio_url` may be an `http(s)` URL, a `file://` URL or a plain
//! filesystem path. Loading reads the whole resource into memory and probes
//! its length from the container metadata.

use std::io::Cursor;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use lofty::prelude::AudioFile;
use lofty::probe::Probe;
use reqwest::blocking::Client;
use url::Url;

use super::sink::SharedBytes;
use super::types::MediaFailure;

/// A fully fetched resource.
pub(super) struct Fetched {
    pub bytes: SharedBytes,
    /// Length from the container metadata, if the probe found one.
    pub duration: Option<Duration>,
}

#[derive(Debug, PartialEq, Eq)]
pub(super) enum Location {
    Remote(Url),
    Local(PathBuf),
}

/// Work out where `raw` points.
pub(super) fn locate(raw: &str) -> Result<Location, MediaFailure> {
    match Url::parse(raw) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(Location::Remote(url)),
            "file" => url
                .to_file_path()
                .map(Location::Local)
                .map_err(|_| MediaFailure::Load(format!("not a local file url: {raw}"))),
            // Windows drive letters parse as a one-letter scheme.
            s if s.len() == 1 => Ok(Location::Local(PathBuf::from(raw))),
            other => Err(MediaFailure::Load(format!("unsupported scheme `{other}`"))),
        },
        Err(url::ParseError::RelativeUrlWithoutBase) => Ok(Location::Local(PathBuf::from(raw))),
        Err(e) => Err(MediaFailure::Load(format!("invalid resource locator {raw}: {e}"))),
    }
}

/// Build the HTTP client shared by all loads. No request timeout: a stuck
/// load stays in `Loading` until the user moves on.
pub(super) fn http_client() -> Option<Client> {
    Client::builder()
        .user_agent(concat!("release-player/", env!("CARGO_PKG_VERSION")))
        .timeout(None::<Duration>)
        .build()
        .map_err(|e| tracing::warn!(error = %e, "http client unavailable; remote tracks will fail"))
        .ok()
}

fn read_remote(client: Option<&Client>, url: Url) -> Result<Vec<u8>, MediaFailure> {
    let client =
        client.ok_or_else(|| MediaFailure::Load("no http client available".to_string()))?;
    let response = client
        .get(url.clone())
        .send()
        .and_then(|r| r.error_for_status())
        .map_err(|e| MediaFailure::Load(format!("fetching {url}: {e}")))?;
    let body = response
        .bytes()
        .map_err(|e| MediaFailure::Load(format!("reading {url}: {e}")))?;
    Ok(body.to_vec())
}

fn probe_duration(bytes: &[u8]) -> Option<Duration> {
    let tagged = Probe::new(Cursor::new(bytes))
        .guess_file_type()
        .ok()?
        .read()
        .ok()?;
    Some(tagged.properties().duration()).filter(|d| !d.is_zero())
}

/// Fetch the resource at `raw` and probe its duration.
pub(super) fn load(raw: &str, client: Option<&Client>) -> Result<Fetched, MediaFailure> {
    let bytes = match locate(raw)? {
        Location::Remote(url) => read_remote(client, url)?,
        Location::Local(path) => std::fs::read(&path)
            .map_err(|e| MediaFailure::Load(format!("reading {}: {e}", path.display())))?,
    };
    if bytes.is_empty() {
        return Err(MediaFailure::Load(format!("{raw} is empty")));
    }

    let duration = probe_duration(&bytes);
    Ok(Fetched {
        bytes: Arc::from(bytes),
        duration,
    })
}
