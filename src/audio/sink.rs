//! Utilities for creating `rodio` sinks from fetched resource bytes.
//!
//! The helpers here decode an in-memory resource and prepare a paused
//! `Sink` at the requested start position.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use super::types::MediaFailure;

pub(super) type SharedBytes = Arc<[u8]>;

pub(super) fn volume(muted: bool) -> f32 {
    if muted { 0.0 } else { 1.0 }
}

/// Decode `bytes`, positioned at `start_at`.
pub(super) fn decode_at(
    bytes: &SharedBytes,
    start_at: Duration,
) -> Result<impl Source + Send + 'static, MediaFailure> {
    let decoder = Decoder::new(Cursor::new(bytes.clone()))
        .map_err(|e| MediaFailure::Load(format!("cannot decode resource: {e}")))?;
    // `skip_duration` is our fallback seeking primitive; even Duration::ZERO is fine.
    Ok(decoder.skip_duration(start_at))
}

/// Length reported by the decoder itself, for streams the tag probe missed.
pub(super) fn decoded_duration(bytes: &SharedBytes) -> Option<Duration> {
    Decoder::new(Cursor::new(bytes.clone()))
        .ok()
        .and_then(|d| d.total_duration())
}

/// Create a paused `Sink` for `bytes` that starts playback at `start_at`.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    bytes: &SharedBytes,
    start_at: Duration,
    muted: bool,
) -> Result<Sink, MediaFailure> {
    let source = decode_at(bytes, start_at)?;
    let sink = Sink::connect_new(stream.mixer());
    sink.set_volume(volume(muted));
    sink.append(source);
    sink.pause();
    Ok(sink)
}
