use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Registration {
    pub id: String,
    pub event_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

impl Registration {
    pub fn new(event_id: String, name: String, email: String, phone: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            event_id,
            name,
            email,
            phone,
            created_at: Utc::now(),
        }
    }
}

/// Registration form as submitted, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationRequest {
    pub event_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}
