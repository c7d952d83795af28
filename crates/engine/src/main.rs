//! Deepdelve Engine - Main entry point.
//!
//! Reads one JSON intent per line from stdin and writes one JSON response per
//! line to stdout. Logs go to stderr.

use std::sync::Arc;

use deepdelve_engine::api::dispatch;
use deepdelve_engine::infrastructure::clock::SystemClock;
use deepdelve_engine::infrastructure::settings::{
    load_dotenv_from_repo_root, EngineConfig, Fixtures,
};
use deepdelve_engine::App;
use deepdelve_shared::{Intent, IntentResponse};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "deepdelve_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Deepdelve Engine");

    let config = EngineConfig::from_env();
    let (app, mut notices) = App::in_memory(
        config.commit_channel_capacity,
        Arc::new(SystemClock::new()),
    );

    if let Some(path) = &config.fixture_path {
        tracing::info!(path = %path.display(), "Loading fixtures");
        let fixtures = Fixtures::load(path).await?;
        app.seed(fixtures).await?;
    }

    // Commit notices are the hand-off point for downstream persistence.
    tokio::spawn(async move {
        loop {
            match notices.recv().await {
                Ok(notice) => tracing::info!(
                    batch_id = %notice.batch_id,
                    player = %notice.player,
                    dungeon = %notice.dungeon,
                    reason = ?notice.reason,
                    version = notice.version,
                    "Commit notice"
                ),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Commit notice listener lagged");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let response = match serde_json::from_str::<Intent>(&line) {
            Ok(intent) => dispatch(&app, intent).await,
            Err(e) => {
                tracing::warn!(error = %e, "Malformed intent");
                IntentResponse::error("MALFORMED_INTENT", e.to_string())
            }
        };
        let mut out = serde_json::to_string(&response)?;
        out.push('\n');
        stdout.write_all(out.as_bytes()).await?;
        stdout.flush().await?;
    }

    tracing::info!("Input closed, shutting down");
    Ok(())
}
