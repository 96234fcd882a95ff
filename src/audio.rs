use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, Mutex};
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Playback blocked: {0}")]
    Blocked(String),
}

/// The one cue currently owned by the manager
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AudioHandle {
    pub id: Uuid,
    pub cue: String,
    pub volume: f32,
    /// False when the backend refused to start it
    pub playing: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AudioEvent {
    Started(AudioHandle),
    Stopped(AudioHandle),
}

/// Host-side player.
///
/// `stop` must pause and rewind synchronously; `start` may fail, for
/// example when the host refuses autoplay.
#[async_trait]
pub trait AudioBackend: Send + Sync {
    fn stop(&self, handle: &AudioHandle);

    async fn start(&self, handle: &AudioHandle) -> Result<(), AudioError>;
}

/// Publishes playback commands to whoever renders audio
pub struct BroadcastAudioBackend {
    tx: broadcast::Sender<AudioEvent>,
}

impl BroadcastAudioBackend {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AudioEvent> {
        self.tx.subscribe()
    }
}

#[async_trait]
impl AudioBackend for BroadcastAudioBackend {
    fn stop(&self, handle: &AudioHandle) {
        let _ = self.tx.send(AudioEvent::Stopped(handle.clone()));
    }

    async fn start(&self, handle: &AudioHandle) -> Result<(), AudioError> {
        self.tx
            .send(AudioEvent::Started(handle.clone()))
            .map(|_| ())
            .map_err(|_| AudioError::Blocked("no audio listener attached".to_string()))
    }
}

/// Keeps at most one audio cue active.
///
/// Calls are serialized on an async mutex, so the previous cue is always
/// stopped before the next one starts, even under concurrent callers.
pub struct AudioCueManager {
    backend: Arc<dyn AudioBackend>,
    volume: f32,
    current: Mutex<Option<AudioHandle>>,
}

impl AudioCueManager {
    pub fn new(backend: Arc<dyn AudioBackend>, volume: f32) -> Self {
        Self {
            backend,
            volume,
            current: Mutex::new(None),
        }
    }

    /// Replace the active cue with `cue`. An empty id leaves playback untouched.
    pub async fn play_cue(&self, cue: &str) {
        if cue.is_empty() {
            return;
        }

        let mut current = self.current.lock().await;
        if let Some(previous) = current.take() {
            self.backend.stop(&previous);
            tracing::debug!(cue = %previous.cue, "Stopped audio cue");
        }

        let handle = AudioHandle {
            id: Uuid::new_v4(),
            cue: cue.to_string(),
            volume: self.volume,
            playing: true,
        };

        // A blocked cue is still owned, so the next call stops it first
        let handle = match self.backend.start(&handle).await {
            Ok(()) => {
                tracing::debug!(cue = %handle.cue, "Started audio cue");
                handle
            }
            Err(e) => {
                metrics::counter!("weathermood_audio_blocked_total").increment(1);
                tracing::warn!(cue = %handle.cue, error = %e, "Audio playback did not start");
                AudioHandle {
                    playing: false,
                    ..handle
                }
            }
        };
        *current = Some(handle);
    }

    /// Stop and release the active cue, if any
    pub async fn stop(&self) {
        if let Some(previous) = self.current.lock().await.take() {
            self.backend.stop(&previous);
            tracing::debug!(cue = %previous.cue, "Stopped audio cue");
        }
    }

    pub async fn current(&self) -> Option<AudioHandle> {
        self.current.lock().await.clone()
    }
}
