use axum::{extract::State, response::Redirect, Form};
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info};
use crate::api::dtos::requests::RegisterEventForm;
use crate::api::extractors::session::CurrentSession;
use crate::api::handlers::event_page;
use crate::domain::services::registration_service::RegistrationError;
use crate::error::AppError;
use crate::state::AppState;

pub async fn register_for_event(
    State(state): State<Arc<AppState>>,
    mut session: CurrentSession,
    Form(form): Form<RegisterEventForm>,
) -> Result<Redirect, AppError> {
    let (request, csrf_token) = form.into_request();

    if let Err(e) = session.verify_csrf(csrf_token.as_deref()) {
        session.flash_error(e.user_message());
        session.save().await?;
        return Ok(Redirect::to("/"));
    }

    let back = event_page(request.event_id.as_deref().unwrap_or_default());

    let target = match state.registration_service.register(request, Utc::now()).await {
        Ok(registration) => {
            info!(event_id = %registration.event_id, "visitor registered");
            session.flash_success("Registration successful!");
            "/".to_string()
        }
        Err(RegistrationError::Invalid(errors)) => {
            session.flash_error(errors.join(" "));
            back
        }
        Err(e @ RegistrationError::EventNotFound) => {
            session.flash_error(e.to_string());
            "/".to_string()
        }
        Err(e @ (RegistrationError::RegistrationClosed | RegistrationError::EventFull)) => {
            session.flash_error(e.to_string());
            back
        }
        Err(RegistrationError::Storage(e)) => {
            error!("registration failed: {:?}", e);
            session.flash_error("Registration failed. Please try again.");
            "/".to_string()
        }
    };

    session.save().await?;
    Ok(Redirect::to(&target))
}
