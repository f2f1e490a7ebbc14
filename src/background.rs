use std::sync::Arc;
use std::time::Duration;
use chrono::Utc;
use tokio::time::sleep;
use tracing::{debug, error, info, info_span, Instrument};
use crate::state::AppState;

/// One maintenance pass: closes every overdue event in bulk and drops expired sessions.
pub async fn run_maintenance(state: &AppState) {
    let now = Utc::now();

    match state.event_repo.close_past_events(now).await {
        Ok(0) => debug!("no overdue events"),
        Ok(closed) => info!(closed, "closed overdue events"),
        Err(e) => error!("Failed to close overdue events: {:?}", e),
    }

    match state.session_store.purge_expired(now).await {
        Ok(0) => {}
        Ok(purged) => info!(purged, "purged expired sessions"),
        Err(e) => error!("Failed to purge sessions: {:?}", e),
    }
}

pub async fn start_background_worker(state: Arc<AppState>) {
    let interval = Duration::from_secs(state.config.maintenance_interval_secs.max(1));
    info!("Starting maintenance worker, interval {:?}", interval);

    loop {
        run_maintenance(&state)
            .instrument(info_span!("maintenance"))
            .await;
        sleep(interval).await;
    }
}
