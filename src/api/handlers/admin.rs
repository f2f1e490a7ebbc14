use axum::{
    extract::{Multipart, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info};
use crate::api::dtos::{
    requests::{DeleteEventQuery, EventIdQuery, EventSubmission, IdQuery},
    responses::{EventCard, EventFormView, EventListView, RegistrationRow, RegistrationsView},
};
use crate::api::extractors::{auth::AdminSession, session::CurrentSession};
use crate::api::render::render_page;
use crate::error::AppError;
use crate::state::AppState;

const DASHBOARD: &str = "/admin-dashboard";

async fn back_to_dashboard(session: &mut CurrentSession, message: &str) -> Result<Response, AppError> {
    session.flash_error(message);
    session.save().await?;
    Ok(Redirect::to(DASHBOARD).into_response())
}

fn requested_id(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|id| !id.is_empty())
}

/// Messages for a failed create/update. Internals are logged, never shown.
fn form_errors(e: AppError) -> Vec<String> {
    match e {
        AppError::Validation(errors) => errors,
        AppError::Forbidden(message) => vec![message],
        other => {
            error!("event form submission failed: {:?}", other);
            vec![other.user_message()]
        }
    }
}

async fn render_form(
    state: &AppState,
    session: &mut CurrentSession,
    view: EventFormView,
) -> Result<Html<String>, AppError> {
    let title = if view.editing { "Edit Event" } else { "Create Event" };
    render_page(state, session, "event_form.html", title, view).await
}

pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    AdminSession { mut session, .. }: AdminSession,
) -> Result<Html<String>, AppError> {
    let tz = state.config.timezone;
    let events = state.lifecycle.list_overviews(Utc::now()).await?
        .into_iter()
        .map(|overview| EventCard::from_overview(overview, tz))
        .collect();

    render_page(&state, &mut session, "admin_dashboard.html", "Admin Dashboard", EventListView { events }).await
}

pub async fn create_event_page(
    State(state): State<Arc<AppState>>,
    AdminSession { mut session, .. }: AdminSession,
) -> Result<Html<String>, AppError> {
    render_form(&state, &mut session, EventFormView::blank()).await
}

pub async fn create_event(
    State(state): State<Arc<AppState>>,
    AdminSession { mut session, identity }: AdminSession,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let mut view = EventFormView::blank();

    let submission = match EventSubmission::from_multipart(multipart).await {
        Ok(submission) => submission,
        Err(e) => {
            view.errors = form_errors(e);
            return Ok(render_form(&state, &mut session, view).await?.into_response());
        }
    };
    view.values = submission.draft.clone();

    if let Err(e) = session.verify_csrf(submission.csrf_token.as_deref()) {
        view.errors = form_errors(e);
        return Ok(render_form(&state, &mut session, view).await?.into_response());
    }

    match state.event_editor.create_event(&submission.draft, submission.image).await {
        Ok(event) => {
            info!(event_id = %event.id, admin_id = %identity.admin_id, "admin created event");
            session.flash_success("Event created successfully!");
            session.save().await?;
            Ok(Redirect::to(DASHBOARD).into_response())
        }
        Err(e) => {
            view.errors = form_errors(e);
            Ok(render_form(&state, &mut session, view).await?.into_response())
        }
    }
}

pub async fn edit_event_page(
    State(state): State<Arc<AppState>>,
    AdminSession { mut session, .. }: AdminSession,
    Query(query): Query<IdQuery>,
) -> Result<Response, AppError> {
    let Some(id) = requested_id(query.id.as_deref()) else {
        return back_to_dashboard(&mut session, "Invalid event ID.").await;
    };
    let Some(event) = state.lifecycle.find_refreshed(id, Utc::now()).await? else {
        return back_to_dashboard(&mut session, "Event not found.").await;
    };

    let view = EventFormView::for_event(&event, state.config.timezone);
    Ok(render_form(&state, &mut session, view).await?.into_response())
}

pub async fn edit_event(
    State(state): State<Arc<AppState>>,
    AdminSession { mut session, identity }: AdminSession,
    Query(query): Query<IdQuery>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let Some(id) = requested_id(query.id.as_deref()) else {
        return back_to_dashboard(&mut session, "Invalid event ID.").await;
    };
    let Some(event) = state.event_repo.find_by_id(id).await? else {
        return back_to_dashboard(&mut session, "Event not found.").await;
    };

    let mut view = EventFormView::for_event(&event, state.config.timezone);

    let submission = match EventSubmission::from_multipart(multipart).await {
        Ok(submission) => submission,
        Err(e) => {
            view.errors = form_errors(e);
            return Ok(render_form(&state, &mut session, view).await?.into_response());
        }
    };
    view.values = submission.draft.clone();

    if let Err(e) = session.verify_csrf(submission.csrf_token.as_deref()) {
        view.errors = form_errors(e);
        return Ok(render_form(&state, &mut session, view).await?.into_response());
    }

    match state.event_editor.update_event(&event.id, &submission.draft, submission.image).await {
        Ok(updated) => {
            info!(event_id = %updated.id, admin_id = %identity.admin_id, "admin updated event");
            session.flash_success("Event updated successfully!");
            session.save().await?;
            Ok(Redirect::to(DASHBOARD).into_response())
        }
        Err(AppError::NotFound(message)) => back_to_dashboard(&mut session, &message).await,
        Err(e) => {
            view.errors = form_errors(e);
            Ok(render_form(&state, &mut session, view).await?.into_response())
        }
    }
}

pub async fn delete_event(
    State(state): State<Arc<AppState>>,
    AdminSession { mut session, identity }: AdminSession,
    Query(query): Query<DeleteEventQuery>,
) -> Result<Response, AppError> {
    if let Err(e) = session.verify_csrf(query.csrf_token.as_deref()) {
        return back_to_dashboard(&mut session, &e.user_message()).await;
    }
    let Some(id) = requested_id(query.id.as_deref()) else {
        return back_to_dashboard(&mut session, "Invalid event ID.").await;
    };

    match state.event_editor.delete_event(id).await {
        Ok(()) => {
            info!(event_id = %id, admin_id = %identity.admin_id, "admin deleted event");
            session.flash_success("Event deleted successfully.");
            session.save().await?;
            Ok(Redirect::to(DASHBOARD).into_response())
        }
        Err(AppError::NotFound(message)) => back_to_dashboard(&mut session, &message).await,
        Err(e) => {
            error!(event_id = %id, "failed to delete event: {:?}", e);
            back_to_dashboard(&mut session, "Failed to delete event.").await
        }
    }
}

pub async fn list_registrations(
    State(state): State<Arc<AppState>>,
    AdminSession { mut session, .. }: AdminSession,
    Query(query): Query<EventIdQuery>,
) -> Result<Response, AppError> {
    let Some(id) = requested_id(query.event_id.as_deref()) else {
        return back_to_dashboard(&mut session, "Invalid event ID.").await;
    };
    let Some(event) = state.event_repo.find_by_id(id).await? else {
        return back_to_dashboard(&mut session, "Event not found.").await;
    };

    let tz = state.config.timezone;
    let overview = state.lifecycle.overview(event, Utc::now()).await?;
    let registrations = state.registration_repo.list_by_event(&overview.event.id).await?
        .into_iter()
        .map(|registration| RegistrationRow::from_registration(registration, tz))
        .collect();

    let title = format!("Registrations - {}", overview.event.title);
    let view = RegistrationsView { event: EventCard::from_overview(overview, tz), registrations };
    Ok(render_page(&state, &mut session, "registrations.html", &title, view).await?.into_response())
}
