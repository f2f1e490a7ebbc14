use crate::domain::models::{
    event::Event, registration::Registration, admin::Admin, session::SessionData,
    asset::{ImageKind, ImageUpload},
};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn create(&self, event: &Event) -> Result<Event, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError>;
    /// All events, latest scheduled first.
    async fn list(&self) -> Result<Vec<Event>, AppError>;
    async fn update(&self, event: &Event) -> Result<Event, AppError>;
    /// Flips an open event to closed. Returns whether a row changed.
    async fn close_if_open(&self, id: &str) -> Result<bool, AppError>;
    async fn close_past_events(&self, now: DateTime<Utc>) -> Result<u64, AppError>;
    /// Removes the event's registrations and then the event, atomically.
    async fn delete_with_registrations(&self, id: &str) -> Result<u64, AppError>;
}

#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    /// Inserts only while the event is below `max_seats`. `None` means the event was full.
    async fn create_within_capacity(&self, registration: &Registration) -> Result<Option<Registration>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Registration>, AppError>;
    async fn count_by_event(&self, event_id: &str) -> Result<i64, AppError>;
    async fn list_by_event(&self, event_id: &str) -> Result<Vec<Registration>, AppError>;
}

#[async_trait]
pub trait AdminRepository: Send + Sync {
    async fn create(&self, admin: &Admin) -> Result<Admin, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, AppError>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self, id: &str) -> Result<Option<SessionData>, AppError>;
    async fn save(&self, id: &str, data: &SessionData) -> Result<(), AppError>;
    async fn destroy(&self, id: &str) -> Result<(), AppError>;
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, AppError>;
}

#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Persists the image under a freshly generated name and returns its reference.
    async fn store(&self, kind: ImageKind, upload: &ImageUpload) -> Result<String, AppError>;
    /// Missing assets are not an error.
    async fn delete(&self, reference: &str) -> Result<(), AppError>;
}
