use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::warn;

use super::thread::{Inbound, spawn_media_thread};
use super::types::{AudioCmd, MediaEvent};

/// Handle to the media thread: commands go in, `MediaEvent`s come out.
pub struct MediaElement {
    tx: Sender<Inbound>,
    events: Receiver<MediaEvent>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl MediaElement {
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel::<Inbound>();
        let (events_tx, events) = mpsc::channel::<MediaEvent>();

        let handle = spawn_media_thread(rx, tx.clone(), events_tx);

        Self {
            tx,
            events,
            join: Mutex::new(Some(handle)),
        }
    }

    pub fn send(&self, cmd: AudioCmd) {
        if self.tx.send(Inbound::Cmd(cmd)).is_err() {
            warn!("media thread is gone; dropping command");
        }
    }

    pub fn send_all(&self, cmds: impl IntoIterator<Item = AudioCmd>) {
        for cmd in cmds {
            self.send(cmd);
        }
    }

    /// Everything the media thread reported since the last call.
    pub fn drain_events(&self) -> Vec<MediaEvent> {
        self.events.try_iter().collect()
    }

    pub fn quit_softly(&self, fade_out: Duration) {
        self.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}
