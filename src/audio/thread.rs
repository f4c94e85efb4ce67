use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use reqwest::blocking::Client;
use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, info, warn};

use super::fetch::{self, Fetched};
use super::sink::{SharedBytes, create_sink_at, decode_at, decoded_duration, volume};
use super::types::{AudioCmd, MediaEvent, MediaEventKind, MediaFailure, PlayRejection, ResourceId};

/// How often progress is reported while playing.
const TICK: Duration = Duration::from_millis(250);

/// Everything the media thread listens to: commands from the player and
/// results from its own loader threads.
pub(super) enum Inbound {
    Cmd(AudioCmd),
    Fetched {
        resource: ResourceId,
        result: Result<Fetched, MediaFailure>,
    },
}

struct Ready {
    bytes: SharedBytes,
    /// `None` when there is no output device.
    sink: Option<Sink>,
    duration: Option<Duration>,
    /// Position the current sink started at when it was rebuilt to seek.
    offset: Duration,
    paused: bool,
    finished: bool,
}

enum Slot {
    Fetching { play_requested: bool },
    Ready(Ready),
    Failed(MediaFailure),
}

struct Current {
    resource: ResourceId,
    slot: Slot,
}

fn emit(events: &Sender<MediaEvent>, resource: ResourceId, kind: MediaEventKind) {
    let _ = events.send(MediaEvent::new(resource, kind));
}

fn position_of(ready: &Ready) -> Duration {
    ready
        .sink
        .as_ref()
        .map_or(ready.offset, |s| ready.offset + s.get_pos())
}

/// Owns the output stream and the single sink. Only ever touched from the
/// media thread.
struct MediaThread {
    stream: Option<OutputStream>,
    client: Option<Client>,
    inbound: Sender<Inbound>,
    events: Sender<MediaEvent>,
    current: Option<Current>,
    muted: bool,
}

impl MediaThread {
    fn handle_cmd(&mut self, cmd: AudioCmd) {
        match cmd {
            AudioCmd::Load { resource, url } => self.load(resource, url),
            AudioCmd::Play(resource) => self.play(resource),
            AudioCmd::Pause => self.pause(),
            AudioCmd::Seek { resource, position } => self.seek(resource, position),
            AudioCmd::SetMuted(muted) => {
                self.muted = muted;
                if let Some(Current {
                    slot: Slot::Ready(ready),
                    ..
                }) = self.current.as_ref()
                {
                    if let Some(sink) = ready.sink.as_ref() {
                        sink.set_volume(volume(muted));
                    }
                }
            }
            AudioCmd::Stop => self.supersede(),
            // Handled by the loop.
            AudioCmd::Quit { .. } => {}
        }
    }

    /// Drop the current resource. A play request still waiting on it is
    /// answered as aborted, which is never an error.
    fn supersede(&mut self) {
        let Some(old) = self.current.take() else {
            return;
        };
        match old.slot {
            Slot::Fetching {
                play_requested: true,
            } => emit(
                &self.events,
                old.resource,
                MediaEventKind::PlayRejected(PlayRejection::Aborted),
            ),
            Slot::Ready(ready) => {
                if let Some(sink) = ready.sink {
                    sink.stop();
                }
            }
            _ => {}
        }
    }

    fn load(&mut self, resource: ResourceId, url: String) {
        self.supersede();
        self.current = Some(Current {
            resource,
            slot: Slot::Fetching {
                play_requested: false,
            },
        });

        info!(%resource, %url, "fetching resource");
        let inbound = self.inbound.clone();
        let client = self.client.clone();
        thread::spawn(move || {
            let result = fetch::load(&url, client.as_ref());
            let _ = inbound.send(Inbound::Fetched { resource, result });
        });
    }

    fn handle_fetched(&mut self, resource: ResourceId, result: Result<Fetched, MediaFailure>) {
        let Some(current) = self.current.as_mut().filter(|c| c.resource == resource) else {
            debug!(%resource, "dropping fetch result for superseded resource");
            return;
        };
        let Slot::Fetching { play_requested } = current.slot else {
            return;
        };

        let fetched = match result {
            Ok(f) => f,
            Err(failure) => {
                current.slot = Slot::Failed(failure.clone());
                emit(&self.events, resource, MediaEventKind::Failed(failure));
                return;
            }
        };

        let sink = match self.stream.as_ref() {
            Some(stream) => create_sink_at(stream, &fetched.bytes, Duration::ZERO, self.muted).map(Some),
            None => decode_at(&fetched.bytes, Duration::ZERO).map(|_| None),
        };
        let sink = match sink {
            Ok(s) => s,
            Err(failure) => {
                current.slot = Slot::Failed(failure.clone());
                emit(&self.events, resource, MediaEventKind::Failed(failure));
                return;
            }
        };

        let duration = fetched
            .duration
            .or_else(|| decoded_duration(&fetched.bytes))
            .filter(|d| !d.is_zero());

        current.slot = Slot::Ready(Ready {
            bytes: fetched.bytes,
            sink,
            duration,
            offset: Duration::ZERO,
            paused: true,
            finished: false,
        });
        emit(&self.events, resource, MediaEventKind::MetadataLoaded { duration });

        if play_requested {
            self.play(resource);
        }
    }

    fn play(&mut self, resource: ResourceId) {
        let Some(current) = self.current.as_mut().filter(|c| c.resource == resource) else {
            emit(
                &self.events,
                resource,
                MediaEventKind::PlayRejected(PlayRejection::Aborted),
            );
            return;
        };

        let ready = match &mut current.slot {
            Slot::Fetching { play_requested } => {
                *play_requested = true;
                emit(&self.events, resource, MediaEventKind::Waiting);
                return;
            }
            Slot::Failed(failure) => {
                let failure = failure.clone();
                emit(
                    &self.events,
                    resource,
                    MediaEventKind::PlayRejected(PlayRejection::Failed(failure)),
                );
                return;
            }
            Slot::Ready(ready) => ready,
        };

        let Some(stream) = self.stream.as_ref() else {
            emit(
                &self.events,
                resource,
                MediaEventKind::PlayRejected(PlayRejection::Failed(MediaFailure::Playback(
                    "no audio output device".to_string(),
                ))),
            );
            return;
        };

        if ready.finished || ready.sink.is_none() {
            // Playing again after the end starts over, like an audio element.
            match create_sink_at(stream, &ready.bytes, Duration::ZERO, self.muted) {
                Ok(sink) => {
                    if let Some(old) = ready.sink.replace(sink) {
                        old.stop();
                    }
                    ready.offset = Duration::ZERO;
                    ready.finished = false;
                }
                Err(failure) => {
                    emit(
                        &self.events,
                        resource,
                        MediaEventKind::PlayRejected(PlayRejection::Failed(failure)),
                    );
                    return;
                }
            }
        }

        if let Some(sink) = ready.sink.as_ref() {
            sink.play();
        }
        ready.paused = false;
        emit(&self.events, resource, MediaEventKind::Playing);
    }

    fn pause(&mut self) {
        let Some(current) = self.current.as_mut() else {
            return;
        };
        match &mut current.slot {
            Slot::Fetching { play_requested } => {
                if std::mem::take(play_requested) {
                    emit(
                        &self.events,
                        current.resource,
                        MediaEventKind::PlayRejected(PlayRejection::Aborted),
                    );
                }
            }
            Slot::Ready(ready) => {
                if let Some(sink) = ready.sink.as_ref() {
                    sink.pause();
                }
                ready.paused = true;
                emit(
                    &self.events,
                    current.resource,
                    MediaEventKind::TimeUpdate {
                        position: position_of(ready),
                        duration: ready.duration,
                    },
                );
            }
            Slot::Failed(_) => {}
        }
    }

    fn seek(&mut self, resource: ResourceId, position: Duration) {
        let Some(current) = self.current.as_mut().filter(|c| c.resource == resource) else {
            return;
        };
        let Slot::Ready(ready) = &mut current.slot else {
            return;
        };
        let position = match ready.duration {
            Some(d) => position.min(d),
            None => position,
        };

        if let Some(sink) = ready.sink.as_ref() {
            if !ready.finished && sink.try_seek(position).is_ok() {
                ready.offset = Duration::ZERO;
            } else if let Some(stream) = self.stream.as_ref() {
                // Source cannot seek: rebuild the sink and skip into the stream.
                match create_sink_at(stream, &ready.bytes, position, self.muted) {
                    Ok(new_sink) => {
                        if !ready.paused && !ready.finished {
                            new_sink.play();
                        }
                        if let Some(old) = ready.sink.replace(new_sink) {
                            old.stop();
                        }
                        ready.offset = position;
                        ready.finished = false;
                    }
                    Err(failure) => {
                        warn!(%resource, error = %failure, "seek failed");
                        return;
                    }
                }
            }
        }

        emit(
            &self.events,
            resource,
            MediaEventKind::TimeUpdate {
                position,
                duration: ready.duration,
            },
        );
    }

    /// Periodic progress report and end-of-stream detection.
    fn tick(&mut self) {
        let Some(current) = self.current.as_mut() else {
            return;
        };
        let Slot::Ready(ready) = &mut current.slot else {
            return;
        };
        let Some(sink) = ready.sink.as_ref() else {
            return;
        };
        if ready.paused || ready.finished {
            return;
        }

        if sink.empty() {
            // Ended media stays paused until the next play request.
            sink.pause();
            ready.paused = true;
            ready.finished = true;
            let position = ready.duration.unwrap_or_else(|| position_of(ready));
            emit(
                &self.events,
                current.resource,
                MediaEventKind::TimeUpdate {
                    position,
                    duration: ready.duration,
                },
            );
            emit(&self.events, current.resource, MediaEventKind::Ended);
            return;
        }

        emit(
            &self.events,
            current.resource,
            MediaEventKind::TimeUpdate {
                position: position_of(ready),
                duration: ready.duration,
            },
        );
    }

    fn quit(&mut self, fade_out_ms: u64) {
        if let Some(Current {
            slot: Slot::Ready(ready),
            ..
        }) = self.current.take()
        {
            if let Some(sink) = ready.sink {
                if !ready.paused && !self.muted {
                    // Fade out gently before stopping.
                    fade_out_sink(&sink, fade_out_ms);
                }
                sink.stop();
            }
        }
    }
}

fn fade_out_sink(sink: &Sink, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    sink.set_volume(1.0);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(1.0 - t);
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}

pub(super) fn spawn_media_thread(
    rx: Receiver<Inbound>,
    inbound: Sender<Inbound>,
    events: Sender<MediaEvent>,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let stream = match OutputStreamBuilder::open_default_stream() {
            Ok(mut stream) => {
                // rodio logs to stderr when OutputStream is dropped. That's useful in
                // debugging, but noisy for a TUI app.
                stream.log_on_drop(false);
                Some(stream)
            }
            Err(e) => {
                warn!(error = %e, "no audio output device; play requests will be refused");
                None
            }
        };

        let mut media = MediaThread {
            stream,
            client: fetch::http_client(),
            inbound,
            events,
            current: None,
            muted: false,
        };

        let mut last_tick = Instant::now();
        loop {
            match rx.recv_timeout(TICK) {
                Ok(Inbound::Cmd(AudioCmd::Quit { fade_out_ms })) => {
                    media.quit(fade_out_ms);
                    break;
                }
                Ok(Inbound::Cmd(cmd)) => media.handle_cmd(cmd),
                Ok(Inbound::Fetched { resource, result }) => media.handle_fetched(resource, result),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => break,
            }

            if last_tick.elapsed() >= TICK {
                media.tick();
                last_tick = Instant::now();
            }
        }
    })
}
