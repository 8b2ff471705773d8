//! Status command handler.

use clap::Args;
use ragdesk_client::RagBackend;
use ragdesk_core::AppResult;
use ragdesk_session::render::render_status;
use ragdesk_session::status::probe;
use std::sync::Arc;

/// Check whether the backend is reachable
#[derive(Args, Debug)]
pub struct StatusCommand {}

impl StatusCommand {
    pub async fn execute(&self, backend: Arc<dyn RagBackend>) -> AppResult<()> {
        tracing::info!("Executing status command");

        let status = probe(backend.as_ref()).await;
        println!("{} ({})", render_status(status), backend.base_url());

        Ok(())
    }
}
