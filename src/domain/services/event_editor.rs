use std::sync::Arc;
use chrono::{DateTime, NaiveDateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use tracing::{info, warn};
use crate::domain::models::asset::{ImageKind, ImageUpload};
use crate::domain::models::event::{Event, EventDraft, EventFields, EventStatus};
use crate::domain::ports::{AssetStore, EventRepository};
use crate::domain::services::validation::required;
use crate::error::AppError;

pub const INVALID_IMAGE: &str = "Invalid image format. Allowed: JPG, PNG, GIF, WEBP";

const LOCAL_FORMATS: [&str; 4] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S"];

/// Accepts `datetime-local` input (read in `tz`) or a full RFC 3339 instant.
pub fn parse_event_datetime(raw: &str, tz: Tz) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(&Utc).with_nanosecond(0);
    }

    LOCAL_FORMATS.iter().find_map(|fmt| {
        let naive = NaiveDateTime::parse_from_str(raw, fmt).ok()?;
        tz.from_local_datetime(&naive).earliest().map(|dt| dt.with_timezone(&Utc))
    })
}

pub fn validate_draft(draft: &EventDraft, tz: Tz) -> Result<EventFields, Vec<String>> {
    let mut errors = Vec::new();

    let title = required(draft.title.as_deref(), "Title", &mut errors);
    let description = required(draft.description.as_deref(), "Description", &mut errors);
    let category = required(draft.category.as_deref(), "Category", &mut errors);
    let raw_datetime = required(draft.event_datetime.as_deref(), "Event date and time", &mut errors);
    let location = required(draft.location.as_deref(), "Location", &mut errors);
    let raw_seats = required(draft.max_seats.as_deref(), "Maximum seats", &mut errors);
    let raw_status = required(draft.status.as_deref(), "Status", &mut errors);

    let event_datetime = raw_datetime.and_then(|raw| {
        let parsed = parse_event_datetime(&raw, tz);
        if parsed.is_none() {
            errors.push("Invalid event date and time.".to_string());
        }
        parsed
    });

    let max_seats = raw_seats.and_then(|raw| match raw.parse::<i32>() {
        Ok(n) if n > 0 => Some(n),
        Ok(_) => {
            errors.push("Maximum seats must be greater than 0.".to_string());
            None
        }
        Err(_) => {
            errors.push("Maximum seats must be a whole number.".to_string());
            None
        }
    });

    let status = raw_status.and_then(|raw| match raw.parse::<EventStatus>() {
        Ok(s) => Some(s),
        Err(_) => {
            errors.push("Invalid status.".to_string());
            None
        }
    });

    match (title, description, category, event_datetime, location, max_seats, status) {
        (Some(title), Some(description), Some(category), Some(event_datetime), Some(location), Some(max_seats), Some(status))
            if errors.is_empty() =>
        {
            Ok(EventFields { title, description, category, event_datetime, location, max_seats, status })
        }
        _ => Err(errors),
    }
}

pub struct EventEditor {
    events: Arc<dyn EventRepository>,
    assets: Arc<dyn AssetStore>,
    timezone: Tz,
}

impl EventEditor {
    pub fn new(events: Arc<dyn EventRepository>, assets: Arc<dyn AssetStore>, timezone: Tz) -> Self {
        Self { events, assets, timezone }
    }

    fn check(&self, draft: &EventDraft, image: Option<&ImageUpload>) -> Result<(EventFields, Option<ImageKind>), AppError> {
        let fields = validate_draft(draft, self.timezone);
        let kind = image.map(|upload| ImageKind::from_mime(&upload.content_type));

        match (fields, kind) {
            (Ok(fields), None) => Ok((fields, None)),
            (Ok(fields), Some(Some(kind))) => Ok((fields, Some(kind))),
            (Ok(_), Some(None)) => Err(AppError::validation(INVALID_IMAGE)),
            (Err(mut errors), kind) => {
                if matches!(kind, Some(None)) {
                    errors.push(INVALID_IMAGE.to_string());
                }
                Err(AppError::Validation(errors))
            }
        }
    }

    async fn discard(&self, reference: &str) {
        if let Err(e) = self.assets.delete(reference).await {
            warn!(image = %reference, "failed to remove image asset: {:?}", e);
        }
    }

    pub async fn create_event(&self, draft: &EventDraft, image: Option<ImageUpload>) -> Result<Event, AppError> {
        let (fields, kind) = self.check(draft, image.as_ref())?;

        let reference = match (kind, image.as_ref()) {
            (Some(kind), Some(upload)) => Some(self.assets.store(kind, upload).await?),
            _ => None,
        };

        let event = Event::new(fields, reference.clone());
        match self.events.create(&event).await {
            Ok(created) => {
                info!(event_id = %created.id, "event created");
                Ok(created)
            }
            Err(e) => {
                if let Some(ref r) = reference {
                    self.discard(r).await;
                }
                Err(e)
            }
        }
    }

    pub async fn update_event(&self, id: &str, draft: &EventDraft, image: Option<ImageUpload>) -> Result<Event, AppError> {
        let mut event = self.events.find_by_id(id).await?
            .ok_or(AppError::NotFound("Event not found.".into()))?;

        let (fields, kind) = self.check(draft, image.as_ref())?;

        let new_reference = match (kind, image.as_ref()) {
            (Some(kind), Some(upload)) => Some(self.assets.store(kind, upload).await?),
            _ => None,
        };

        let previous = event.image.clone();
        event.apply(fields);
        if new_reference.is_some() {
            event.image = new_reference.clone();
        }

        match self.events.update(&event).await {
            Ok(updated) => {
                if let (Some(_), Some(old)) = (&new_reference, &previous) {
                    self.discard(old).await;
                }
                info!(event_id = %updated.id, "event updated");
                Ok(updated)
            }
            Err(e) => {
                if let Some(ref r) = new_reference {
                    self.discard(r).await;
                }
                Err(e)
            }
        }
    }

    pub async fn delete_event(&self, id: &str) -> Result<(), AppError> {
        let event = self.events.find_by_id(id).await?
            .ok_or(AppError::NotFound("Event not found.".into()))?;

        let removed = self.events.delete_with_registrations(&event.id).await?;
        info!(event_id = %event.id, registrations_removed = removed, "event deleted");

        if let Some(ref image) = event.image {
            self.discard(image).await;
        }
        Ok(())
    }
}
