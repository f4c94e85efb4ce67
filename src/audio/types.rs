//! Messages crossing the media boundary.
//!
//! `AudioCmd` flows from the `Player` into the media thread; `MediaEvent`
//! flows back. Every message that refers to a loaded resource carries the
//! `ResourceId` of the load it belongs to, so answers for a superseded load
//! can be recognised and dropped.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Identity of one load attempt. Strictly increasing within a run.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(pub u64);

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AudioCmd {
    /// Replace whatever is loaded with the resource at `url`.
    Load { resource: ResourceId, url: String },
    /// Start or resume playback of `resource`.
    Play(ResourceId),
    /// Pause the current resource.
    Pause,
    /// Jump to `position` inside `resource`.
    Seek {
        resource: ResourceId,
        position: Duration,
    },
    SetMuted(bool),
    /// Drop the current resource entirely.
    Stop,
    /// Quit the media thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// A genuine media failure. Both kinds are shown to the user the same way
/// and only told apart in the logs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaFailure {
    /// The resource could not be fetched or decoded.
    #[error("load error: {0}")]
    Load(String),
    /// The runtime refused to play a resource that did load.
    #[error("playback error: {0}")]
    Playback(String),
}

impl MediaFailure {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Load(_) => "load",
            Self::Playback(_) => "playback",
        }
    }
}

/// Why a play request did not start playback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayRejection {
    /// The request was interrupted by a newer load or a pause.
    Aborted,
    Failed(MediaFailure),
}

#[derive(Debug, Clone, PartialEq)]
pub enum MediaEventKind {
    /// The resource is decoded; `duration` is `None` when the stream does not say.
    MetadataLoaded { duration: Option<Duration> },
    /// Playback was requested but data is not ready yet.
    Waiting,
    /// Audio is actually being produced.
    Playing,
    TimeUpdate {
        position: Duration,
        duration: Option<Duration>,
    },
    Ended,
    Failed(MediaFailure),
    PlayRejected(PlayRejection),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MediaEvent {
    pub resource: ResourceId,
    pub kind: MediaEventKind,
}

impl MediaEvent {
    pub fn new(resource: ResourceId, kind: MediaEventKind) -> Self {
        Self { resource, kind }
    }
}
