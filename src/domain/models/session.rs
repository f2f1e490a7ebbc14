use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminIdentity {
    pub admin_id: String,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticated(AdminIdentity),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    pub admin: Option<AdminIdentity>,
    pub csrf_token: Option<String>,
    pub flash_error: Option<String>,
    pub flash_success: Option<String>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Flash {
    pub error: Option<String>,
    pub success: Option<String>,
}

impl SessionData {
    pub fn new(expires_at: DateTime<Utc>) -> Self {
        Self {
            admin: None,
            csrf_token: None,
            flash_error: None,
            flash_success: None,
            expires_at,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn auth_state(&self) -> AuthState {
        match &self.admin {
            Some(identity) => AuthState::Authenticated(identity.clone()),
            None => AuthState::Anonymous,
        }
    }

    pub fn take_flash(&mut self) -> Flash {
        Flash {
            error: self.flash_error.take(),
            success: self.flash_success.take(),
        }
    }
}
