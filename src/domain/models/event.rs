use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Open,
    Closed,
}

#[derive(Debug, Error)]
#[error("unknown event status: {0}")]
pub struct UnknownStatus(pub String);

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Open => "open",
            EventStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(EventStatus::Open),
            "closed" => Ok(EventStatus::Closed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

impl TryFrom<String> for EventStatus {
    type Error = UnknownStatus;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub event_datetime: DateTime<Utc>,
    pub location: String,
    pub max_seats: i32,
    #[sqlx(try_from = "String")]
    pub status: EventStatus,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn new(fields: EventFields, image: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: fields.title,
            description: fields.description,
            category: fields.category,
            event_datetime: fields.event_datetime,
            location: fields.location,
            max_seats: fields.max_seats,
            status: fields.status,
            image,
            created_at: Utc::now(),
        }
    }

    /// Overwrites every admin-editable field, leaving id, image and creation time alone.
    pub fn apply(&mut self, fields: EventFields) {
        self.title = fields.title;
        self.description = fields.description;
        self.category = fields.category;
        self.event_datetime = fields.event_datetime;
        self.location = fields.location;
        self.max_seats = fields.max_seats;
        self.status = fields.status;
    }
}

/// Event form as submitted. `None` means the field was absent from the request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub event_datetime: Option<String>,
    pub location: Option<String>,
    pub max_seats: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EventFields {
    pub title: String,
    pub description: String,
    pub category: String,
    pub event_datetime: DateTime<Utc>,
    pub location: String,
    pub max_seats: i32,
    pub status: EventStatus,
}

/// An event together with its live seat accounting.
#[derive(Debug, Clone)]
pub struct EventOverview {
    pub event: Event,
    pub registrations_count: i64,
    pub seats_available: i64,
}
