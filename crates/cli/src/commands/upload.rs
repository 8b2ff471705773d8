//! Upload command handler.
//!
//! Uploads files one at a time. Directories are walked for the document
//! types the backend can ingest.

use clap::Args;
use ragdesk_client::RagBackend;
use ragdesk_core::{AppError, AppResult};
use ragdesk_session::render::render_document_list;
use ragdesk_session::{BusyPolicy, CompletionKind, InteractionController, UserAction};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

/// Extensions the backend knows how to extract text from.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["pdf", "txt", "md"];

/// Upload documents into the knowledge base
#[derive(Args, Debug)]
pub struct UploadCommand {
    /// Files or directories to upload
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Print the document list after the last upload
    #[arg(long)]
    pub list: bool,
}

impl UploadCommand {
    pub async fn execute(&self, backend: Arc<dyn RagBackend>, policy: BusyPolicy) -> AppResult<()> {
        tracing::info!("Executing upload command");

        let files = collect_files(&self.paths)?;
        if files.is_empty() {
            println!("No .pdf, .txt or .md files found");
            return Ok(());
        }
        tracing::debug!("Uploading {} files", files.len());

        let mut controller = InteractionController::new(backend, policy);
        let mut printed = 0;

        for file in files {
            controller.dispatch(UserAction::UploadFile(file));
            super::print_new_messages(&controller, &mut printed);

            while let Some(kind) = controller.next_completion().await {
                if kind == CompletionKind::Upload {
                    super::print_new_messages(&controller, &mut printed);
                }
            }
        }

        if self.list {
            println!();
            println!("{}", render_document_list(controller.state().browser.list()));
        }

        Ok(())
    }
}

fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Expand directories into their supported files, sorted for a stable order.
///
/// Explicitly named files are kept whatever their extension; the backend
/// decides whether it can ingest them.
fn collect_files(paths: &[PathBuf]) -> AppResult<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            let mut found: Vec<PathBuf> = WalkDir::new(path)
                .into_iter()
                .filter_map(|entry| match entry {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        tracing::warn!("Skipping unreadable entry: {}", e);
                        None
                    }
                })
                .filter(|entry| entry.file_type().is_file() && is_supported(entry.path()))
                .map(|entry| entry.into_path())
                .collect();
            found.sort();
            files.extend(found);
        } else if path.exists() {
            files.push(path.clone());
        } else {
            return Err(AppError::Config(format!("Path does not exist: {:?}", path)));
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported(Path::new("report.pdf")));
        assert!(is_supported(Path::new("NOTES.MD")));
        assert!(is_supported(Path::new("a/b/policy.txt")));
        assert!(!is_supported(Path::new("image.png")));
        assert!(!is_supported(Path::new("Makefile")));
    }

    #[test]
    fn test_collect_walks_directories() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        std::fs::write(dir.path().join("b.md"), "b").unwrap();
        std::fs::write(dir.path().join("a.pdf"), "a").unwrap();
        std::fs::write(dir.path().join("skip.png"), "x").unwrap();
        std::fs::write(dir.path().join("nested/c.txt"), "c").unwrap();

        let files = collect_files(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| {
                p.strip_prefix(dir.path())
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();

        assert_eq!(names, vec!["a.pdf", "b.md", "nested/c.txt"]);
    }

    #[test]
    fn test_collect_keeps_explicit_files() {
        let dir = tempfile::tempdir().unwrap();
        let explicit = dir.path().join("scan.docx");
        std::fs::write(&explicit, "x").unwrap();

        assert_eq!(collect_files(&[explicit.clone()]).unwrap(), vec![explicit]);
    }

    #[test]
    fn test_collect_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(collect_files(&[dir.path().join("nope.pdf")]).is_err());
    }
}
