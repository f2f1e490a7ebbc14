use axum::{extract::{Query, State}, response::{Html, IntoResponse, Redirect, Response}};
use chrono::Utc;
use std::sync::Arc;
use crate::api::dtos::{
    requests::IdQuery,
    responses::{EventCard, EventDetailView, EventListView},
};
use crate::api::extractors::session::CurrentSession;
use crate::api::render::render_page;
use crate::error::AppError;
use crate::state::AppState;

pub async fn list_events(
    State(state): State<Arc<AppState>>,
    mut session: CurrentSession,
) -> Result<Html<String>, AppError> {
    let tz = state.config.timezone;
    let events = state.lifecycle.list_overviews(Utc::now()).await?
        .into_iter()
        .map(|overview| EventCard::from_overview(overview, tz))
        .collect();

    render_page(&state, &mut session, "index.html", "Upcoming Events", EventListView { events }).await
}

pub async fn get_event(
    State(state): State<Arc<AppState>>,
    mut session: CurrentSession,
    Query(query): Query<IdQuery>,
) -> Result<Response, AppError> {
    let Some(id) = query.id.as_deref().map(str::trim).filter(|id| !id.is_empty()) else {
        return Ok(Redirect::to("/").into_response());
    };

    let Some(event) = state.event_repo.find_by_id(id).await? else {
        return Ok(Redirect::to("/").into_response());
    };

    let overview = state.lifecycle.overview(event, Utc::now()).await?;
    let title = overview.event.title.clone();
    let view = EventDetailView { event: EventCard::from_overview(overview, state.config.timezone) };

    Ok(render_page(&state, &mut session, "event.html", &title, view).await?.into_response())
}
