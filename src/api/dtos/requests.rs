use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use serde::Deserialize;
use tracing::warn;
use crate::domain::models::admin::AdminSignup;
use crate::domain::models::asset::ImageUpload;
use crate::domain::models::event::EventDraft;
use crate::domain::models::registration::RegistrationRequest;
use crate::error::AppError;

#[derive(Deserialize, Default)]
pub struct IdQuery {
    pub id: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct EventIdQuery {
    pub event_id: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct DeleteEventQuery {
    pub id: Option<String>,
    pub csrf_token: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct RegisterEventForm {
    pub event_id: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub csrf_token: Option<String>,
}

impl RegisterEventForm {
    pub fn into_request(self) -> (RegistrationRequest, Option<String>) {
        let request = RegistrationRequest {
            event_id: self.event_id,
            name: self.name,
            email: self.email,
            phone: self.phone,
        };
        (request, self.csrf_token)
    }
}

#[derive(Deserialize, Default)]
pub struct LoginForm {
    pub email: Option<String>,
    pub password: Option<String>,
    pub csrf_token: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct AdminSignupForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
    pub csrf_token: Option<String>,
}

impl AdminSignupForm {
    pub fn into_signup(self) -> (AdminSignup, Option<String>) {
        let signup = AdminSignup {
            name: self.name,
            email: self.email,
            password: self.password,
            confirm_password: self.confirm_password,
        };
        (signup, self.csrf_token)
    }
}

/// Multipart event form: text fields, an optional image and the CSRF token.
#[derive(Default)]
pub struct EventSubmission {
    pub draft: EventDraft,
    pub image: Option<ImageUpload>,
    pub csrf_token: Option<String>,
}

fn multipart_failure(err: MultipartError) -> AppError {
    warn!("unreadable multipart body: {}", err.body_text());
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::validation("The uploaded image is too large.")
    } else {
        AppError::validation("The form could not be read. Please try again.")
    }
}

impl EventSubmission {
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut submission = EventSubmission::default();

        while let Some(field) = multipart.next_field().await.map_err(multipart_failure)? {
            let name = field.name().unwrap_or_default().to_string();

            if name == "image" {
                let content_type = field.content_type().unwrap_or("application/octet-stream").to_string();
                let file_name = field.file_name().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_failure)?;

                // Browsers send an empty, unnamed part when no file was chosen.
                let no_file = bytes.is_empty() && file_name.as_deref().is_none_or(str::is_empty);
                if !no_file {
                    submission.image = Some(ImageUpload { content_type, bytes: bytes.to_vec() });
                }
                continue;
            }

            let value = field.text().await.map_err(multipart_failure)?;
            let draft = &mut submission.draft;
            match name.as_str() {
                "title" => draft.title = Some(value),
                "description" => draft.description = Some(value),
                "category" => draft.category = Some(value),
                "event_datetime" => draft.event_datetime = Some(value),
                "location" => draft.location = Some(value),
                "max_seats" => draft.max_seats = Some(value),
                "status" => draft.status = Some(value),
                "csrf_token" => submission.csrf_token = Some(value),
                _ => {}
            }
        }

        Ok(submission)
    }
}
