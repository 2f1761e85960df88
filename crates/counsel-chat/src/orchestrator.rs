//! Session orchestrator: the central coordinator for one chat view.
//!
//! Owns the compose draft, the pending attachments, the per-view session id,
//! and the accumulated session documents. A send extracts newly attached
//! documents (all-or-nothing), appends the user's message, calls the remote
//! assistant, and appends the answer or a synthesized error report. Every
//! call to the backend ends in exactly one assistant append.

use std::sync::{Arc, Mutex};

use futures::future::try_join_all;
use uuid::Uuid;

use counsel_client::{AskRequest, AssistantBackend};
use counsel_core::config::UploadConfig;
use counsel_core::types::ChatMessage;
use counsel_extract::{AttachedFile, DocumentExtractor};
use counsel_store::ChatStore;

use crate::attachments::{filter_pdf_selection, SelectionOutcome};
use crate::error::ChatError;
use crate::phase::{PhaseMachine, SendPhase};

/// Question sent when documents are attached but the compose box was empty.
const FALLBACK_QUESTION: &str = "Analyze these documents";

/// Marker glyph prefixing the attachment listing in the user message.
const ATTACHMENT_GLYPH: &str = "\u{1F4CE}";

/// Remediation hint appended to every synthesized error message.
const ERROR_HINT: &str = "Please ensure the backend server is running and try again.";

/// Result of a send attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// A user turn and exactly one assistant turn were appended.
    Completed,
    /// Precondition not met (empty draft, no active chat, or a send already
    /// in flight). Nothing changed.
    Ignored,
}

/// Mutable per-view state, guarded by one mutex.
#[derive(Default)]
struct ViewState {
    draft: String,
    attachments: Vec<AttachedFile>,
    /// Texts already sent to the backend for this session; used only to
    /// compute the `use_documents` flag on later turns.
    session_documents: Vec<String>,
}

/// Central coordinator for one active chat view.
///
/// The session id is created at construction and never persisted: reopening
/// a chat view yields a fresh session, so server-side document context does
/// not survive a reload.
pub struct SessionOrchestrator {
    store: Arc<ChatStore>,
    extractor: Arc<dyn DocumentExtractor>,
    backend: Arc<dyn AssistantBackend>,
    upload: UploadConfig,
    session_id: Uuid,
    phase: PhaseMachine,
    view: Mutex<ViewState>,
}

impl SessionOrchestrator {
    /// Create an orchestrator for a freshly opened chat view.
    pub fn new(
        store: Arc<ChatStore>,
        extractor: Arc<dyn DocumentExtractor>,
        backend: Arc<dyn AssistantBackend>,
        upload: UploadConfig,
    ) -> Self {
        let session_id = Uuid::new_v4();
        tracing::debug!(%session_id, "Chat view session opened");
        Self {
            store,
            extractor,
            backend,
            upload,
            session_id,
            phase: PhaseMachine::new(),
            view: Mutex::new(ViewState::default()),
        }
    }

    /// Ephemeral correlation token for this view's backend calls.
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Whether a send is in flight.
    pub fn is_loading(&self) -> bool {
        self.phase.current() != SendPhase::Idle
    }

    /// Current send phase.
    pub fn phase(&self) -> SendPhase {
        self.phase.current()
    }

    /// Current compose-box contents.
    pub fn draft(&self) -> Result<String, ChatError> {
        Ok(self.lock_view()?.draft.clone())
    }

    /// Replace the compose-box contents.
    pub fn set_draft(&self, text: impl Into<String>) -> Result<(), ChatError> {
        self.lock_view()?.draft = text.into();
        Ok(())
    }

    /// Commit a FINAL voice transcript increment to the compose box,
    /// followed by a single trailing space.
    pub fn append_transcript(&self, text: &str) -> Result<(), ChatError> {
        let mut view = self.lock_view()?;
        view.draft.push_str(text);
        view.draft.push(' ');
        Ok(())
    }

    /// Names of the pending attachments.
    pub fn attachment_names(&self) -> Result<Vec<String>, ChatError> {
        Ok(self
            .lock_view()?
            .attachments
            .iter()
            .map(|f| f.name.clone())
            .collect())
    }

    /// Number of document texts already folded into this session.
    pub fn session_document_count(&self) -> Result<usize, ChatError> {
        Ok(self.lock_view()?.session_documents.len())
    }

    /// Add a file selection to the pending attachments.
    ///
    /// Non-PDFs are dropped silently; the pending list is capped with a
    /// notice in the outcome when a selection exceeds it.
    pub fn select_files(&self, files: Vec<AttachedFile>) -> Result<SelectionOutcome, ChatError> {
        let mut view = self.lock_view()?;
        let (mut accepted, outcome) =
            filter_pdf_selection(view.attachments.len(), files, self.upload.max_files);
        view.attachments.append(&mut accepted);
        if let Some(notice) = &outcome.notice {
            tracing::info!(%notice, "File selection capped");
        }
        Ok(outcome)
    }

    /// Remove one pending attachment by index. Out-of-range is a no-op.
    pub fn remove_attachment(&self, index: usize) -> Result<(), ChatError> {
        let mut view = self.lock_view()?;
        if index < view.attachments.len() {
            view.attachments.remove(index);
        }
        Ok(())
    }

    /// Run one send operation.
    ///
    /// No-op when the trimmed draft is empty and no files are attached, when
    /// no active chat exists, or when a send is already in flight. Otherwise
    /// the operation always ends back in the idle phase, with the loading
    /// indicator cleared exactly once.
    pub async fn send(&self) -> Result<SendOutcome, ChatError> {
        let chat_id = match self.store.current_chat()? {
            Some(chat) => chat.id,
            None => {
                tracing::debug!("Send ignored: no active chat");
                return Ok(SendOutcome::Ignored);
            }
        };

        let (draft, attachments) = {
            let view = self.lock_view()?;
            (view.draft.trim().to_string(), view.attachments.clone())
        };
        if draft.is_empty() && attachments.is_empty() {
            return Ok(SendOutcome::Ignored);
        }

        // In-flight guard: a second send while one is running requests an
        // invalid Idle -> * transition and is ignored.
        let first_phase = if attachments.is_empty() {
            SendPhase::AwaitingResponse
        } else {
            SendPhase::ExtractingAttachments
        };
        if self.phase.transition(first_phase).is_err() {
            tracing::debug!("Send ignored: another send is in flight");
            return Ok(SendOutcome::Ignored);
        }

        let result = self.run_send(chat_id, draft, attachments).await;
        // Single exit back to idle, taken on success and on every error path.
        self.phase.reset();
        result
    }

    async fn run_send(
        &self,
        chat_id: Uuid,
        draft: String,
        attachments: Vec<AttachedFile>,
    ) -> Result<SendOutcome, ChatError> {
        // Step 1: extract every new attachment concurrently, all-or-nothing.
        // On failure nothing has been appended and no call is made; the
        // pending attachments are retained so the user can retry.
        let new_texts = if attachments.is_empty() {
            Vec::new()
        } else {
            let texts =
                try_join_all(attachments.iter().map(|file| self.extractor.extract(file))).await?;
            self.phase.transition(SendPhase::AwaitingResponse)?;
            texts
        };

        // Step 2: build the outgoing user message.
        let question = if draft.is_empty() {
            FALLBACK_QUESTION.to_string()
        } else {
            draft.clone()
        };
        let user_text = if attachments.is_empty() {
            draft
        } else {
            let names: Vec<&str> = attachments.iter().map(|f| f.name.as_str()).collect();
            format!("{}\n\n{} {}", question, ATTACHMENT_GLYPH, names.join(", "))
        };

        // Step 3: append the user message.
        self.store.add_message(chat_id, ChatMessage::user(user_text))?;

        // Step 4: clear the draft and pending attachments before the network
        // call resolves, and fold the new texts into the session accumulator.
        let use_documents = {
            let mut view = self.lock_view()?;
            view.draft.clear();
            view.attachments.clear();
            view.session_documents.extend(new_texts.iter().cloned());
            !view.session_documents.is_empty()
        };

        // Step 5: one backend call, one assistant append, success or error.
        let request = AskRequest {
            question,
            use_documents,
            session_id: self.session_id.to_string(),
            document_texts: new_texts,
        };
        let reply = match self.backend.ask(&request).await {
            Ok(response) => ChatMessage::assistant(response.answer),
            Err(e) => {
                tracing::warn!(error = %e, "Backend call failed, synthesizing error reply");
                ChatMessage::assistant(format!("Error: {}\n\n{}", e.user_message(), ERROR_HINT))
            }
        };

        if let Err(e) = self.store.add_message(chat_id, reply) {
            // The chat may have been deleted while the call was in flight.
            tracing::error!(error = %e, %chat_id, "Failed to append assistant reply");
        }
        Ok(SendOutcome::Completed)
    }

    fn lock_view(&self) -> Result<std::sync::MutexGuard<'_, ViewState>, ChatError> {
        self.view
            .lock()
            .map_err(|e| ChatError::State(format!("view lock poisoned: {}", e)))
    }
}

// =============================================================================
// Tests
// =============================================================================
