use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;
use crate::domain::models::event::{Event, EventDraft, EventOverview, EventStatus};
use crate::domain::models::registration::Registration;
use crate::domain::models::session::{AdminIdentity, Flash};

const DISPLAY_FORMAT: &str = "%B %-d, %Y at %-I:%M %p";
const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

pub fn display_time(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format(DISPLAY_FORMAT).to_string()
}

/// Shared chrome for every rendered page.
#[derive(Serialize)]
pub struct Page<T: Serialize> {
    pub title: String,
    pub flash: Flash,
    pub csrf_token: String,
    pub admin: Option<AdminIdentity>,
    #[serde(flatten)]
    pub body: T,
}

#[derive(Serialize)]
pub struct EventCard {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub event_datetime: String,
    pub location: String,
    pub max_seats: i32,
    pub status: EventStatus,
    pub image: Option<String>,
    pub registrations_count: i64,
    pub seats_available: i64,
    pub can_register: bool,
}

impl EventCard {
    pub fn from_overview(overview: EventOverview, tz: Tz) -> Self {
        let EventOverview { event, registrations_count, seats_available } = overview;
        EventCard {
            can_register: event.status == EventStatus::Open && seats_available > 0,
            event_datetime: display_time(event.event_datetime, tz),
            id: event.id,
            title: event.title,
            description: event.description,
            category: event.category,
            location: event.location,
            max_seats: event.max_seats,
            status: event.status,
            image: event.image,
            registrations_count,
            seats_available,
        }
    }
}

#[derive(Serialize)]
pub struct EventListView {
    pub events: Vec<EventCard>,
}

#[derive(Serialize)]
pub struct EventDetailView {
    pub event: EventCard,
}

#[derive(Serialize, Default)]
pub struct LoginView {
    pub email: String,
}

#[derive(Serialize, Default)]
pub struct SignupView {
    pub name: String,
    pub email: String,
}

#[derive(Serialize)]
pub struct EventFormView {
    pub editing: bool,
    pub event_id: Option<String>,
    pub values: EventDraft,
    pub current_image: Option<String>,
    pub errors: Vec<String>,
}

impl EventFormView {
    pub fn blank() -> Self {
        EventFormView {
            editing: false,
            event_id: None,
            values: EventDraft { status: Some(EventStatus::Open.to_string()), ..Default::default() },
            current_image: None,
            errors: Vec::new(),
        }
    }

    pub fn for_event(event: &Event, tz: Tz) -> Self {
        EventFormView {
            editing: true,
            event_id: Some(event.id.clone()),
            values: EventDraft {
                title: Some(event.title.clone()),
                description: Some(event.description.clone()),
                category: Some(event.category.clone()),
                event_datetime: Some(event.event_datetime.with_timezone(&tz).format(INPUT_FORMAT).to_string()),
                location: Some(event.location.clone()),
                max_seats: Some(event.max_seats.to_string()),
                status: Some(event.status.to_string()),
            },
            current_image: event.image.clone(),
            errors: Vec::new(),
        }
    }
}

#[derive(Serialize)]
pub struct RegistrationRow {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub registered_at: String,
}

impl RegistrationRow {
    pub fn from_registration(registration: Registration, tz: Tz) -> Self {
        RegistrationRow {
            registered_at: display_time(registration.created_at, tz),
            name: registration.name,
            email: registration.email,
            phone: registration.phone,
        }
    }
}

#[derive(Serialize)]
pub struct RegistrationsView {
    pub event: EventCard,
    pub registrations: Vec<RegistrationRow>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_display_time_in_zone() {
        let instant = Utc.with_ymd_and_hms(2031, 7, 4, 16, 5, 0).unwrap();
        assert_eq!(display_time(instant, chrono_tz::UTC), "July 4, 2031 at 4:05 PM");
        let ny: Tz = "America/New_York".parse().unwrap();
        assert_eq!(display_time(instant, ny), "July 4, 2031 at 12:05 PM");
    }
}
