//! Session state and its transitions.
//!
//! Handlers here are synchronous and never touch the network. A user
//! action or a request completion goes in; the models are updated and the
//! follow-up requests come out.

use crate::browser::DocumentBrowser;
use crate::chat::{ChatSession, Message};
use crate::status::BackendStatus;
use ragdesk_client::{AskResponse, ChunkListing, DocumentSummary, HealthStatus, UploadReceipt};
use ragdesk_core::AppResult;
use serde::Serialize;
use std::path::PathBuf;

/// Assistant text used when an answer comes back without one.
pub const NO_ANSWER_FALLBACK: &str = "No answer returned.";

/// Assistant text used when a question fails for any reason.
pub const ASK_FAILED_MESSAGE: &str = "Error: unable to reach backend.";

/// Assistant text used when an upload fails for any reason.
pub const UPLOAD_FAILED_MESSAGE: &str = "Upload failed.";

pub fn uploading_message(filename: &str) -> String {
    format!("Uploading {}...", filename)
}

pub fn upload_complete_message(receipt: &UploadReceipt) -> String {
    format!(
        "Upload complete. Inserted {} chunks from {}.",
        receipt.chunks_inserted, receipt.filename
    )
}

/// Whether ask and upload share a busy token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum BusyPolicy {
    /// Ask and upload run independently; only asks gate asks.
    #[default]
    Independent,
    /// While any ask or upload is outstanding, new asks and uploads are ignored.
    SingleFlight,
}

impl BusyPolicy {
    pub fn from_single_flight(single_flight: bool) -> Self {
        if single_flight {
            BusyPolicy::SingleFlight
        } else {
            BusyPolicy::Independent
        }
    }
}

/// Something the user did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    SubmitQuestion(String),
    UploadFile(PathBuf),
    RefreshDocuments,
    SelectDocument(String),
    CheckHealth,
}

/// A backend call the controller must issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    CheckHealth,
    Ask { question: String },
    Upload { path: PathBuf, filename: String },
    ListDocuments,
    DocumentChunks { document: String, generation: u64 },
}

impl Request {
    pub fn kind(&self) -> &'static str {
        match self {
            Request::CheckHealth => "health",
            Request::Ask { .. } => "ask",
            Request::Upload { .. } => "upload",
            Request::ListDocuments => "list_documents",
            Request::DocumentChunks { .. } => "document_chunks",
        }
    }
}

/// The resolution of a [`Request`].
#[derive(Debug)]
pub enum Completion {
    Health(HealthStatus),
    Answered(AppResult<AskResponse>),
    Uploaded {
        filename: String,
        result: AppResult<UploadReceipt>,
    },
    DocumentsListed(AppResult<Vec<DocumentSummary>>),
    ChunksLoaded {
        document: String,
        generation: u64,
        result: AppResult<ChunkListing>,
    },
}

/// Everything the views are rendered from.
#[derive(Debug, Clone, Serialize)]
pub struct SessionState {
    pub status: BackendStatus,
    pub chat: ChatSession,
    pub browser: DocumentBrowser,
    policy: BusyPolicy,
    asking: bool,
    uploads_in_flight: usize,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(BusyPolicy::default())
    }
}

impl SessionState {
    pub fn new(policy: BusyPolicy) -> Self {
        Self {
            status: BackendStatus::Unknown,
            chat: ChatSession::new(),
            browser: DocumentBrowser::new(),
            policy,
            asking: false,
            uploads_in_flight: 0,
        }
    }

    pub fn policy(&self) -> BusyPolicy {
        self.policy
    }

    /// Whether an ask is outstanding.
    pub fn is_asking(&self) -> bool {
        self.asking
    }

    pub fn uploads_in_flight(&self) -> usize {
        self.uploads_in_flight
    }

    fn ask_blocked(&self) -> bool {
        match self.policy {
            BusyPolicy::Independent => self.asking,
            BusyPolicy::SingleFlight => self.asking || self.uploads_in_flight > 0,
        }
    }

    fn upload_blocked(&self) -> bool {
        match self.policy {
            BusyPolicy::Independent => false,
            BusyPolicy::SingleFlight => self.asking || self.uploads_in_flight > 0,
        }
    }

    fn sync_input(&mut self) {
        let enabled = !self.ask_blocked();
        self.chat.set_input_enabled(enabled);
    }

    /// Apply a user action and return the requests to issue.
    pub fn handle_action(&mut self, action: UserAction) -> Vec<Request> {
        match action {
            UserAction::SubmitQuestion(question) => self.submit_question(question),
            UserAction::UploadFile(path) => self.select_file(path),
            UserAction::RefreshDocuments => {
                self.browser.begin_list_refresh();
                vec![Request::ListDocuments]
            }
            UserAction::SelectDocument(document) => {
                let generation = self.browser.select(&document);
                vec![Request::DocumentChunks {
                    document,
                    generation,
                }]
            }
            UserAction::CheckHealth => vec![Request::CheckHealth],
        }
    }

    fn submit_question(&mut self, question: String) -> Vec<Request> {
        let question = question.trim();
        if question.is_empty() {
            return Vec::new();
        }
        if self.ask_blocked() {
            tracing::debug!("Ignoring question while busy");
            return Vec::new();
        }

        self.chat.push(Message::user(question));
        self.asking = true;
        self.chat.set_loading(true);
        self.sync_input();

        vec![Request::Ask {
            question: question.to_string(),
        }]
    }

    fn select_file(&mut self, path: PathBuf) -> Vec<Request> {
        let filename = match path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => {
                tracing::warn!("Ignoring upload of {:?}: no file name", path);
                return Vec::new();
            }
        };
        if self.upload_blocked() {
            tracing::debug!("Ignoring upload of {} while busy", filename);
            return Vec::new();
        }

        self.chat.push(Message::assistant(uploading_message(&filename)));
        self.uploads_in_flight += 1;
        self.sync_input();

        vec![Request::Upload { path, filename }]
    }

    /// Apply a request completion and return any cascaded requests.
    pub fn handle_completion(&mut self, completion: Completion) -> Vec<Request> {
        match completion {
            Completion::Health(health) => {
                self.status = BackendStatus::from(health);
                Vec::new()
            }
            Completion::Answered(result) => {
                self.finish_ask(result);
                Vec::new()
            }
            Completion::Uploaded { filename, result } => self.finish_upload(&filename, result),
            Completion::DocumentsListed(result) => {
                self.browser.apply_list(result);
                Vec::new()
            }
            Completion::ChunksLoaded {
                document,
                generation,
                result,
            } => {
                let chunks = result.map(|listing| listing.chunks);
                self.browser.apply_chunks(&document, generation, chunks);
                Vec::new()
            }
        }
    }

    fn finish_ask(&mut self, result: AppResult<AskResponse>) {
        match result {
            Ok(response) => {
                let answer = response
                    .answer
                    .filter(|answer| !answer.is_empty())
                    .unwrap_or_else(|| NO_ANSWER_FALLBACK.to_string());
                self.chat.push(Message::assistant(answer));
                self.chat.replace_sources(response.sources);
            }
            Err(e) => {
                tracing::warn!("Ask failed: {}", e);
                self.chat.push(Message::assistant(ASK_FAILED_MESSAGE));
            }
        }

        self.asking = false;
        self.chat.set_loading(false);
        self.sync_input();
    }

    fn finish_upload(&mut self, filename: &str, result: AppResult<UploadReceipt>) -> Vec<Request> {
        self.uploads_in_flight = self.uploads_in_flight.saturating_sub(1);
        self.sync_input();

        match result {
            Ok(receipt) => {
                tracing::info!(
                    "Uploaded {} ({} chunks)",
                    receipt.filename,
                    receipt.chunks_inserted
                );
                self.chat.push(Message::assistant(upload_complete_message(&receipt)));
                self.handle_action(UserAction::RefreshDocuments)
            }
            Err(e) => {
                tracing::warn!("Upload of {} failed: {}", filename, e);
                self.chat.push(Message::assistant(UPLOAD_FAILED_MESSAGE));
                Vec::new()
            }
        }
    }
}
