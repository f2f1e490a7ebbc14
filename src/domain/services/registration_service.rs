use std::sync::Arc;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};
use crate::domain::models::event::{Event, EventStatus};
use crate::domain::models::registration::{Registration, RegistrationRequest};
use crate::domain::ports::{EventRepository, RegistrationRepository};
use crate::domain::services::lifecycle::EventLifecycle;
use crate::domain::services::validation::{is_valid_email, is_valid_name, is_valid_phone, required};
use crate::error::AppError;

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("{}", .0.join(" "))]
    Invalid(Vec<String>),
    #[error("Event not found.")]
    EventNotFound,
    #[error("Registration is closed for this event.")]
    RegistrationClosed,
    #[error("All seats are full for this event.")]
    EventFull,
    #[error(transparent)]
    Storage(#[from] AppError),
}

struct ValidRegistration {
    event: Event,
    name: String,
    email: String,
    phone: String,
}

pub struct RegistrationService {
    events: Arc<dyn EventRepository>,
    registrations: Arc<dyn RegistrationRepository>,
    lifecycle: Arc<EventLifecycle>,
}

impl RegistrationService {
    pub fn new(
        events: Arc<dyn EventRepository>,
        registrations: Arc<dyn RegistrationRepository>,
        lifecycle: Arc<EventLifecycle>,
    ) -> Self {
        Self { events, registrations, lifecycle }
    }

    pub async fn register(&self, request: RegistrationRequest, now: DateTime<Utc>) -> Result<Registration, RegistrationError> {
        let valid = self.validate(&request).await?;

        let event = self.events.find_by_id(&valid.event.id).await?
            .ok_or(RegistrationError::EventNotFound)?;
        let event = self.lifecycle.refresh_status(event, now).await;

        if event.status != EventStatus::Open {
            return Err(RegistrationError::RegistrationClosed);
        }

        let count = self.registrations.count_by_event(&event.id).await?;
        if count >= i64::from(event.max_seats) {
            return Err(RegistrationError::EventFull);
        }

        let registration = Registration::new(event.id.clone(), valid.name, valid.email, valid.phone);

        match self.registrations.create_within_capacity(&registration).await? {
            Some(created) => {
                info!(event_id = %event.id, registration_id = %created.id, "registration confirmed");
                Ok(created)
            }
            None => {
                warn!(event_id = %event.id, "capacity reached between count and insert");
                Err(RegistrationError::EventFull)
            }
        }
    }

    async fn validate(&self, request: &RegistrationRequest) -> Result<ValidRegistration, RegistrationError> {
        let mut errors = Vec::new();

        let event = match request.event_id.as_deref().map(str::trim) {
            None => {
                errors.push("Event is missing.".to_string());
                None
            }
            Some("") => {
                errors.push("Invalid event.".to_string());
                None
            }
            Some(id) => {
                let found = self.events.find_by_id(id).await?;
                if found.is_none() {
                    errors.push("Event not found.".to_string());
                }
                found
            }
        };

        let name = required(request.name.as_deref(), "Name", &mut errors);
        if let Some(ref n) = name
            && !is_valid_name(n) {
            errors.push("Name should only contain letters and spaces.".to_string());
        }

        let email = required(request.email.as_deref(), "Email", &mut errors);
        if let Some(ref e) = email
            && !is_valid_email(e) {
            errors.push("Invalid email format.".to_string());
        }

        let phone = required(request.phone.as_deref(), "Phone", &mut errors);
        if let Some(ref p) = phone
            && !is_valid_phone(p) {
            errors.push("Phone number must be exactly 10 digits.".to_string());
        }

        match (event, name, email, phone) {
            (Some(event), Some(name), Some(email), Some(phone)) if errors.is_empty() => {
                Ok(ValidRegistration { event, name, email, phone })
            }
            _ => Err(RegistrationError::Invalid(errors)),
        }
    }
}
