//! Chat command handler.
//!
//! Interactive session: stdin lines become user actions, and backend
//! responses are printed as they arrive, while the prompt stays usable.

use clap::Args;
use ragdesk_client::RagBackend;
use ragdesk_core::AppResult;
use ragdesk_session::render::{
    render_chunk_viewer, render_document_list, render_snapshot, render_sources, render_status,
};
use ragdesk_session::{
    BusyPolicy, ChunkContent, CompletionKind, DocumentListView, InteractionController, UserAction,
};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "\
Type a question and press enter to ask it.

Commands:
  /upload <path>    upload a .pdf, .txt or .md document
  /docs             refresh the document list
  /open <document>  show the stored chunks of a document
  /sources          show the sources of the last answer
  /status           probe the backend again
  /view             print the whole session view
  /help             show this help
  /quit             leave the session";

/// Interactive chat session (default)
#[derive(Args, Debug, Default)]
pub struct ChatCommand {
    /// Print source cards after every answer
    #[arg(long)]
    pub show_sources: bool,
}

/// A parsed line of REPL input.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Action(UserAction),
    ShowSources,
    ShowView,
    Help,
    Quit,
    Usage(&'static str),
    Unknown(String),
}

fn parse_input(line: &str) -> Input {
    let trimmed = line.trim();
    let Some(command) = trimmed.strip_prefix('/') else {
        return Input::Action(UserAction::SubmitQuestion(line.to_string()));
    };

    let (name, argument) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };

    match name {
        "quit" | "exit" => Input::Quit,
        "help" => Input::Help,
        "sources" => Input::ShowSources,
        "view" => Input::ShowView,
        "docs" => Input::Action(UserAction::RefreshDocuments),
        "status" => Input::Action(UserAction::CheckHealth),
        "upload" if argument.is_empty() => Input::Usage("/upload <path>"),
        "upload" => Input::Action(UserAction::UploadFile(PathBuf::from(argument))),
        "open" if argument.is_empty() => Input::Usage("/open <document>"),
        "open" => Input::Action(UserAction::SelectDocument(argument.to_string())),
        other => Input::Unknown(other.to_string()),
    }
}

fn print_prompt(controller: &InteractionController) {
    let marker = if controller.state().chat.input_enabled() {
        "> "
    } else {
        "… "
    };
    print!("{}", marker);
    std::io::stdout().flush().ok();
}

impl ChatCommand {
    pub async fn execute(&self, backend: Arc<dyn RagBackend>, policy: BusyPolicy) -> AppResult<()> {
        tracing::info!("Executing chat command");

        let mut controller = InteractionController::new(backend, policy);
        controller.start();

        println!("Connected to {}. Type /help for commands.", controller.backend().base_url());
        print_prompt(&controller);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut printed = 0;

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line? else {
                        // Input closed; finish what is still in flight
                        println!();
                        self.drain(&mut controller, &mut printed).await;
                        break;
                    };

                    match parse_input(&line) {
                        Input::Quit => break,
                        Input::Help => println!("{}", HELP),
                        Input::ShowSources => {
                            println!("{}", render_sources(controller.state().chat.sources()))
                        }
                        Input::ShowView => println!("{}", render_snapshot(&controller.snapshot())),
                        Input::Usage(usage) => println!("Usage: {}", usage),
                        Input::Unknown(name) => println!("Unknown command /{}. Type /help.", name),
                        Input::Action(action) => {
                            let issued = controller.dispatch(action);
                            tracing::debug!("Issued {} requests", issued);
                            self.show_pending(&controller);
                        }
                    }

                    super::print_new_messages(&controller, &mut printed);
                    print_prompt(&controller);
                }
                Some(kind) = controller.next_completion(), if controller.outstanding() > 0 => {
                    // Finish the prompt line before printing output
                    println!();
                    super::print_new_messages(&controller, &mut printed);
                    self.show_completion(&controller, kind);
                    print_prompt(&controller);
                }
            }
        }

        if controller.outstanding() > 0 {
            tracing::debug!(
                "Leaving with {} requests outstanding",
                controller.outstanding()
            );
        }
        println!();

        Ok(())
    }

    /// Apply and print completions until nothing is outstanding.
    async fn drain(&self, controller: &mut InteractionController, printed: &mut usize) {
        while let Some(kind) = controller.next_completion().await {
            super::print_new_messages(controller, printed);
            self.show_completion(controller, kind);
        }
    }

    /// Show placeholders for views that just entered a loading state.
    fn show_pending(&self, controller: &InteractionController) {
        let state = controller.state();
        if let Some(viewer) = state.browser.viewer() {
            if viewer.content == ChunkContent::Loading {
                println!("{}", render_chunk_viewer(Some(viewer)));
            }
        }
        if *state.browser.list() == DocumentListView::Loading {
            println!("{}", render_document_list(state.browser.list()));
        }
    }

    fn show_completion(&self, controller: &InteractionController, kind: CompletionKind) {
        let state = controller.state();
        match kind {
            CompletionKind::Health => println!("{}", render_status(state.status)),
            CompletionKind::Answer if self.show_sources => {
                let sources = render_sources(state.chat.sources());
                if !sources.is_empty() {
                    println!("{}", sources);
                }
            }
            CompletionKind::Documents => {
                println!("{}", render_document_list(state.browser.list()))
            }
            CompletionKind::Chunks { applied: true } => {
                println!("{}", render_chunk_viewer(state.browser.viewer()))
            }
            _ => {}
        }
    }
}
