use axum::response::Html;
use serde::Serialize;
use tera::Context;
use crate::api::dtos::responses::Page;
use crate::api::extractors::session::CurrentSession;
use crate::error::AppError;
use crate::state::AppState;

/// Renders `template` with the page chrome. Consumes pending flash messages
/// and persists the session so the CSRF token embedded in the page stays valid.
pub async fn render_page<T: Serialize>(
    state: &AppState,
    session: &mut CurrentSession,
    template: &str,
    title: &str,
    body: T,
) -> Result<Html<String>, AppError> {
    let page = Page {
        title: title.to_string(),
        flash: session.take_flash(),
        csrf_token: session.csrf_token(),
        admin: session.admin().cloned(),
        body,
    };
    session.save().await?;

    let context = Context::from_serialize(&page)?;
    let html = state.templates.render(template, &context)?;
    Ok(Html(html))
}
