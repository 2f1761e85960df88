//! Voice capture adapter.
//!
//! Wraps a platform dictation capability behind a bounded event channel. The
//! platform side pushes transcript increments tagged final-or-interim; the
//! single consumer commits only FINAL increments, in arrival order. Interim
//! increments may be read for live display but are never committed to the
//! compose box.

use tokio::sync::mpsc;

use crate::error::ChatError;

/// One event from the dictation capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEvent {
    /// A transcript increment.
    Transcript { text: String, is_final: bool },
    /// Adapter-reported failure. Capture stops when this is consumed.
    Error(String),
}

impl TranscriptEvent {
    pub fn final_text(text: impl Into<String>) -> Self {
        TranscriptEvent::Transcript {
            text: text.into(),
            is_final: true,
        }
    }

    pub fn interim(text: impl Into<String>) -> Self {
        TranscriptEvent::Transcript {
            text: text.into(),
            is_final: false,
        }
    }
}

/// Producer handle given to the platform capability.
pub type TranscriptSender = mpsc::Sender<TranscriptEvent>;

/// Consumer side of the dictation event stream with an explicit
/// start/stop lifecycle.
pub struct VoiceCapture {
    receiver: mpsc::Receiver<TranscriptEvent>,
    active: bool,
    last_interim: Option<String>,
}

impl VoiceCapture {
    /// Create a capture adapter with a bounded channel of the given capacity.
    ///
    /// Returns the adapter and the producer handle for the platform
    /// capability. Dropping every producer handle ends the stream.
    pub fn new(capacity: usize) -> (Self, TranscriptSender) {
        let (sender, receiver) = mpsc::channel(capacity);
        (
            Self {
                receiver,
                active: false,
                last_interim: None,
            },
            sender,
        )
    }

    /// Whether capture is currently active.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Most recent interim increment, for live display only.
    pub fn last_interim(&self) -> Option<&str> {
        self.last_interim.as_deref()
    }

    /// Start listening for transcript events.
    pub fn start(&mut self) -> Result<(), ChatError> {
        if self.active {
            return Err(ChatError::Voice(
                "voice capture is already active".to_string(),
            ));
        }
        self.active = true;
        self.last_interim = None;
        tracing::info!("Voice capture started");
        Ok(())
    }

    /// Stop listening. Pending events stay queued until the next start.
    pub fn stop(&mut self) -> Result<(), ChatError> {
        if !self.active {
            return Err(ChatError::Voice("voice capture is not active".to_string()));
        }
        self.active = false;
        self.last_interim = None;
        tracing::info!("Voice capture stopped");
        Ok(())
    }

    /// Wait for the next FINAL transcript increment.
    ///
    /// Interim increments are recorded for display and skipped. Returns
    /// `Ok(None)` when every producer handle has been dropped (capture
    /// stops). An adapter-reported error also stops capture and is
    /// propagated to the caller.
    pub async fn next_final(&mut self) -> Result<Option<String>, ChatError> {
        if !self.active {
            return Err(ChatError::Voice("voice capture is not active".to_string()));
        }

        loop {
            match self.receiver.recv().await {
                Some(TranscriptEvent::Transcript { text, is_final: true }) => {
                    self.last_interim = None;
                    return Ok(Some(text));
                }
                Some(TranscriptEvent::Transcript { text, is_final: false }) => {
                    tracing::trace!(interim = %text, "Interim transcript");
                    self.last_interim = Some(text);
                }
                Some(TranscriptEvent::Error(msg)) => {
                    self.active = false;
                    self.last_interim = None;
                    tracing::warn!(error = %msg, "Voice capture error, stopping");
                    return Err(ChatError::Voice(msg));
                }
                None => {
                    self.active = false;
                    return Ok(None);
                }
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
