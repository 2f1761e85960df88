//! Chat session orchestration for Counsel.
//!
//! For a given chat view, coordinates extraction of newly attached documents,
//! appends the user's message, calls the remote assistant with the correct
//! document flag and session id, and appends the resulting answer or a
//! synthesized error message. Every user turn yields exactly one assistant
//! turn, success or error.

pub mod attachments;
pub mod error;
pub mod orchestrator;
pub mod phase;
pub mod voice;

pub use attachments::{filter_pdf_selection, SelectionOutcome, TOO_MANY_FILES_NOTICE};
pub use error::ChatError;
pub use orchestrator::{SendOutcome, SessionOrchestrator};
pub use phase::{PhaseMachine, SendPhase};
pub use voice::{TranscriptEvent, TranscriptSender, VoiceCapture};
