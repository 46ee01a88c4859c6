use std::time::Duration;

use anyhow::{Context, Result};
use egresados::{backup, router, AppConfig, AppState, Database};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const SESSION_SWEEP: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load_default()?.with_env()?;
    info!("{} starting", config.project.name);

    let db = Database::init(&config.database.url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database.url))?;
    info!("Database ready ({:?})", db.kind());

    let schedule =
        backup::spawn_schedule(db.clone(), config.database.url.clone(), config.backup.clone());
    if schedule.is_none() {
        info!("Scheduled backups disabled");
    }

    if !config.assets.dir.exists() {
        warn!(
            "Static directory {:?} not found; the validation module will not load",
            config.assets.dir
        );
    }

    let addr = config.bind_address();
    let state = AppState::new(db, config);

    // sessions are only dropped on access otherwise
    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SESSION_SWEEP);
        loop {
            ticker.tick().await;
            let purged = sessions.purge_expired().await;
            if purged > 0 {
                info!("Purged {} expired session(s)", purged);
            }
        }
    });

    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
