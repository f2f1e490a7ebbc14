use std::sync::Arc;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use crate::domain::models::event::{Event, EventOverview, EventStatus};
use crate::domain::ports::{EventRepository, RegistrationRepository};
use crate::error::AppError;

/// Status an event should have at `now`. Time only ever closes an event.
pub fn compute_effective_status(event: &Event, now: DateTime<Utc>) -> EventStatus {
    if event.status == EventStatus::Closed || now >= event.event_datetime {
        EventStatus::Closed
    } else {
        EventStatus::Open
    }
}

/// Plain subtraction; a negative result means capacity accounting is broken upstream.
pub fn compute_availability(max_seats: i32, registration_count: i64) -> i64 {
    i64::from(max_seats) - registration_count
}

pub struct EventLifecycle {
    events: Arc<dyn EventRepository>,
    registrations: Arc<dyn RegistrationRepository>,
}

impl EventLifecycle {
    pub fn new(events: Arc<dyn EventRepository>, registrations: Arc<dyn RegistrationRepository>) -> Self {
        Self { events, registrations }
    }

    /// Writes the closed status back when the stored record is stale.
    /// Failures are logged and swallowed; the next read retries.
    pub async fn persist_status_if_changed(&self, stored: &Event, effective: EventStatus) -> bool {
        if stored.status == effective || effective != EventStatus::Closed {
            return false;
        }

        match self.events.close_if_open(&stored.id).await {
            Ok(changed) => {
                debug!(event_id = %stored.id, changed, "closed event past its scheduled time");
                changed
            }
            Err(e) => {
                warn!(event_id = %stored.id, "failed to persist closed status: {:?}", e);
                false
            }
        }
    }

    pub async fn refresh_status(&self, mut event: Event, now: DateTime<Utc>) -> Event {
        let effective = compute_effective_status(&event, now);
        self.persist_status_if_changed(&event, effective).await;
        event.status = effective;
        event
    }

    pub async fn find_refreshed(&self, id: &str, now: DateTime<Utc>) -> Result<Option<Event>, AppError> {
        match self.events.find_by_id(id).await? {
            Some(event) => Ok(Some(self.refresh_status(event, now).await)),
            None => Ok(None),
        }
    }

    pub async fn overview(&self, event: Event, now: DateTime<Utc>) -> Result<EventOverview, AppError> {
        let event = self.refresh_status(event, now).await;
        let registrations_count = self.registrations.count_by_event(&event.id).await?;
        let seats_available = compute_availability(event.max_seats, registrations_count);

        Ok(EventOverview { event, registrations_count, seats_available })
    }

    pub async fn list_overviews(&self, now: DateTime<Utc>) -> Result<Vec<EventOverview>, AppError> {
        let events = self.events.list().await?;
        let mut overviews = Vec::with_capacity(events.len());
        for event in events {
            overviews.push(self.overview(event, now).await?);
        }
        Ok(overviews)
    }
}
