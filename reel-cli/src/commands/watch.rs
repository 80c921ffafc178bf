//! Watch command handler
//!
//! Runs a session and redraws the job list every time the state changes,
//! until interrupted with Ctrl-C.

use anyhow::Result;
use reel_client::JobBackend;
use reel_session::{Config, Session};
use std::sync::Arc;
use tracing::info;

use crate::render;

pub async fn watch_jobs(config: &Config, backend: Arc<dyn JobBackend>, limit: usize) -> Result<()> {
    let session = Session::start(config, backend);
    let mut updates = session.subscribe();

    render::clear_screen();
    render::print_watch_header(config, &session.snapshot());

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted, stopping");
                break;
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = updates.borrow_and_update().clone();
                render::clear_screen();
                render::print_watch_header(config, &state);
                render::print_job_list(&state, limit);
            }
        }
    }

    session.shutdown().await;
    Ok(())
}
