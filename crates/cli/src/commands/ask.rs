//! Ask command handler.
//!
//! Sends a single question through the interaction controller and prints
//! the answer with its source cards.

use clap::Args;
use ragdesk_client::RagBackend;
use ragdesk_core::{AppError, AppResult};
use ragdesk_session::render::render_sources;
use ragdesk_session::{BusyPolicy, InteractionController, Role, UserAction};
use std::path::PathBuf;
use std::sync::Arc;

/// Ask a single question
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub question: Option<String>,

    /// Read the question from a file
    #[arg(short, long, conflicts_with = "question")]
    pub file: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    pub async fn execute(&self, backend: Arc<dyn RagBackend>, policy: BusyPolicy) -> AppResult<()> {
        tracing::info!("Executing ask command");
        tracing::debug!("Ask command options: {:?}", self);

        let question = self.get_question()?;

        let mut controller = InteractionController::new(backend, policy);
        if controller.dispatch(UserAction::SubmitQuestion(question.clone())) == 0 {
            println!("Nothing to ask. Usage: ragdesk ask <question>");
            return Ok(());
        }
        controller.settle().await;

        let state = controller.state();
        let answer = state
            .chat
            .messages()
            .iter()
            .rev()
            .find(|message| message.role == Role::Assistant)
            .map(|message| message.text.as_str())
            .unwrap_or_default();

        if self.json {
            let output = serde_json::json!({
                "question": question.trim(),
                "answer": answer,
                "sources": state.chat.sources(),
            });
            println!("{}", super::to_json_string(&output)?);
        } else {
            println!("{}", answer);

            let sources = state.chat.sources();
            if !sources.is_empty() {
                println!();
                println!("{}", render_sources(sources));
            }
        }

        Ok(())
    }

    /// Get the question text from the argument or the file.
    fn get_question(&self) -> AppResult<String> {
        if let Some(question) = &self.question {
            return Ok(question.clone());
        }

        match &self.file {
            Some(path) => std::fs::read_to_string(path).map_err(|e| {
                AppError::Config(format!("Failed to read question file {:?}: {}", path, e))
            }),
            None => Err(AppError::Config("No question provided".to_string())),
        }
    }
}
