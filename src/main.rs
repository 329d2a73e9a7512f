use mood_journal::{ApiClient, AppState, Config, SessionEvent, SessionEvents, router};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env()?;
    let addr = config.listen_addr()?;

    let events = SessionEvents::new();
    let api = ApiClient::new(&config.api_base_url, config.api_timeout, events.clone())?;
    watch_sessions(&events);

    info!(
        api = %config.api_base_url,
        update_addressing = ?config.update_addressing,
        "mood api configured"
    );

    let app = router(AppState::new(config, api));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Logs every expired session reported by the API client.
fn watch_sessions(events: &SessionEvents) {
    let mut rx = events.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(SessionEvent::Expired { route, redirect }) => {
                    warn!(%route, redirect, "api rejected session token");
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "session event log fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    });
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
