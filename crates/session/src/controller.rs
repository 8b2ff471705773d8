//! Interaction controller.
//!
//! Runs the requests produced by [`SessionState`] as tokio tasks. Every
//! task reports back over one channel and the controller applies the
//! completions one at a time, in the order the responses arrive. Only the
//! controller mutates the state, so handlers never interleave.

use crate::state::{BusyPolicy, Completion, Request, SessionState, UserAction};
use ragdesk_client::RagBackend;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Which kind of completion was just applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionKind {
    Health,
    Answer,
    Upload,
    Documents,
    /// `applied` is false when a stale chunk response was discarded.
    Chunks { applied: bool },
}

pub struct InteractionController {
    state: SessionState,
    backend: Arc<dyn RagBackend>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    outstanding: usize,
}

impl InteractionController {
    pub fn new(backend: Arc<dyn RagBackend>, policy: BusyPolicy) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            state: SessionState::new(policy),
            backend,
            completions_tx,
            completions_rx,
            outstanding: 0,
        }
    }

    /// Probe the backend and load the document list.
    pub fn start(&mut self) {
        tracing::debug!("Starting session against {}", self.backend.base_url());
        self.dispatch(UserAction::CheckHealth);
        self.dispatch(UserAction::RefreshDocuments);
    }

    /// Apply a user action and issue its requests immediately.
    ///
    /// Returns the number of requests issued; zero means the action was a
    /// no-op (blank question, busy, ...).
    pub fn dispatch(&mut self, action: UserAction) -> usize {
        let requests = self.state.handle_action(action);
        let issued = requests.len();
        for request in requests {
            self.issue(request);
        }
        issued
    }

    fn issue(&mut self, request: Request) {
        tracing::debug!(kind = request.kind(), "Issuing request");
        self.outstanding += 1;

        let backend = Arc::clone(&self.backend);
        let tx = self.completions_tx.clone();
        tokio::spawn(async move {
            let completion = execute(backend.as_ref(), request).await;
            // The receiver lives as long as the controller.
            let _ = tx.send(completion);
        });
    }

    /// Wait for the next response and apply it.
    ///
    /// Returns `None` when nothing is outstanding. Cancel-safe: a completion
    /// is either fully applied or left in the channel.
    pub async fn next_completion(&mut self) -> Option<CompletionKind> {
        if self.outstanding == 0 {
            return None;
        }

        let completion = self.completions_rx.recv().await?;
        self.outstanding -= 1;

        let kind = match &completion {
            Completion::Health(_) => CompletionKind::Health,
            Completion::Answered(_) => CompletionKind::Answer,
            Completion::Uploaded { .. } => CompletionKind::Upload,
            Completion::DocumentsListed(_) => CompletionKind::Documents,
            Completion::ChunksLoaded {
                document,
                generation,
                ..
            } => CompletionKind::Chunks {
                applied: self.state.browser.is_current(document, *generation),
            },
        };
        tracing::debug!(?kind, "Applying completion");

        let follow_up = self.state.handle_completion(completion);
        for request in follow_up {
            self.issue(request);
        }

        Some(kind)
    }

    /// Apply completions until no request is outstanding.
    pub async fn settle(&mut self) {
        while self.next_completion().await.is_some() {}
    }

    /// Number of issued requests that have not resolved yet.
    pub fn outstanding(&self) -> usize {
        self.outstanding
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Owned copy of the current state for rendering.
    pub fn snapshot(&self) -> SessionState {
        self.state.clone()
    }

    pub fn backend(&self) -> &Arc<dyn RagBackend> {
        &self.backend
    }
}

/// Perform one backend call.
async fn execute(backend: &dyn RagBackend, request: Request) -> Completion {
    match request {
        Request::CheckHealth => Completion::Health(backend.check_health().await),
        Request::Ask { question } => Completion::Answered(backend.ask(&question).await),
        Request::Upload { path, filename } => {
            let result = match tokio::fs::read(&path).await {
                Ok(bytes) => backend.upload(bytes, &filename).await,
                Err(e) => {
                    tracing::warn!("Failed to read {:?}: {}", path, e);
                    Err(e.into())
                }
            };
            Completion::Uploaded { filename, result }
        }
        Request::ListDocuments => Completion::DocumentsListed(backend.list_documents().await),
        Request::DocumentChunks {
            document,
            generation,
        } => {
            let result = backend.get_document_chunks(&document).await;
            Completion::ChunksLoaded {
                document,
                generation,
                result,
            }
        }
    }
}
