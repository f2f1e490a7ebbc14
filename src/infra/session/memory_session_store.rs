use std::collections::HashMap;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use crate::domain::{models::session::SessionData, ports::SessionStore};
use crate::error::AppError;

/// Process-local session storage. Sessions do not survive a restart.
#[derive(Default)]
pub struct MemorySessionStore {
    sessions: RwLock<HashMap<String, SessionData>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, id: &str) -> Result<Option<SessionData>, AppError> {
        let now = Utc::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(id) {
                None => return Ok(None),
                Some(data) if !data.is_expired(now) => return Ok(Some(data.clone())),
                Some(_) => {}
            }
        }

        self.sessions.write().await.remove(id);
        debug!("dropped expired session on load");
        Ok(None)
    }

    async fn save(&self, id: &str, data: &SessionData) -> Result<(), AppError> {
        self.sessions.write().await.insert(id.to_string(), data.clone());
        Ok(())
    }

    async fn destroy(&self, id: &str) -> Result<(), AppError> {
        self.sessions.write().await.remove(id);
        Ok(())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, AppError> {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, data| !data.is_expired(now));
        Ok(before - sessions.len())
    }
}
