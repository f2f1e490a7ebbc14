use axum::{extract::State, response::{IntoResponse, Redirect, Response}, Form};
use std::sync::Arc;
use tracing::{error, info};
use crate::api::dtos::{
    requests::{AdminSignupForm, LoginForm},
    responses::{LoginView, SignupView},
};
use crate::api::extractors::session::CurrentSession;
use crate::api::render::render_page;
use crate::domain::models::session::AuthState;
use crate::domain::services::auth_service::identity_of;
use crate::error::AppError;
use crate::state::AppState;

const DASHBOARD: &str = "/admin-dashboard";

fn is_signed_in(session: &CurrentSession) -> bool {
    matches!(session.auth_state(), AuthState::Authenticated(_))
}

pub async fn login_page(
    State(state): State<Arc<AppState>>,
    mut session: CurrentSession,
) -> Result<Response, AppError> {
    if is_signed_in(&session) {
        return Ok(Redirect::to(DASHBOARD).into_response());
    }
    Ok(render_page(&state, &mut session, "login.html", "Admin Login", LoginView::default()).await?.into_response())
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    mut session: CurrentSession,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    if is_signed_in(&session) {
        return Ok(Redirect::to(DASHBOARD).into_response());
    }

    let view = LoginView { email: form.email.clone().unwrap_or_default() };

    if let Err(e) = session.verify_csrf(form.csrf_token.as_deref()) {
        session.flash_error(e.user_message());
        return Ok(render_page(&state, &mut session, "login.html", "Admin Login", view).await?.into_response());
    }

    match state.auth_service.authenticate(form.email.as_deref(), form.password.as_deref()).await {
        Ok(admin) => {
            session.sign_in(identity_of(&admin)).await?;
            session.save().await?;
            info!(admin_id = %admin.id, "admin signed in");
            Ok(Redirect::to(DASHBOARD).into_response())
        }
        Err(e) => {
            let message = match &e {
                AppError::Unauthorized => "Invalid email or password.".to_string(),
                AppError::Validation(_) => e.user_message(),
                _ => {
                    error!("login failed: {:?}", e);
                    e.user_message()
                }
            };
            session.flash_error(message);
            Ok(render_page(&state, &mut session, "login.html", "Admin Login", view).await?.into_response())
        }
    }
}

pub async fn register_page(
    State(state): State<Arc<AppState>>,
    mut session: CurrentSession,
) -> Result<Response, AppError> {
    if is_signed_in(&session) {
        return Ok(Redirect::to(DASHBOARD).into_response());
    }
    Ok(render_page(&state, &mut session, "register.html", "Admin Registration", SignupView::default()).await?.into_response())
}

pub async fn register(
    State(state): State<Arc<AppState>>,
    mut session: CurrentSession,
    Form(form): Form<AdminSignupForm>,
) -> Result<Response, AppError> {
    if is_signed_in(&session) {
        return Ok(Redirect::to(DASHBOARD).into_response());
    }

    let (signup, csrf_token) = form.into_signup();
    let view = SignupView {
        name: signup.name.clone().unwrap_or_default(),
        email: signup.email.clone().unwrap_or_default(),
    };

    if let Err(e) = session.verify_csrf(csrf_token.as_deref()) {
        session.flash_error(e.user_message());
        return Ok(render_page(&state, &mut session, "register.html", "Admin Registration", view).await?.into_response());
    }

    match state.auth_service.register_admin(&signup).await {
        Ok(_) => {
            session.flash_success("Registration successful! Please login.");
            session.save().await?;
            Ok(Redirect::to("/login").into_response())
        }
        Err(e) => {
            if !matches!(e, AppError::Validation(_) | AppError::Conflict(_)) {
                error!("admin registration failed: {:?}", e);
            }
            session.flash_error(e.user_message());
            Ok(render_page(&state, &mut session, "register.html", "Admin Registration", view).await?.into_response())
        }
    }
}

pub async fn logout(session: CurrentSession) -> Result<Redirect, AppError> {
    if let Some(admin) = session.admin() {
        info!(admin_id = %admin.admin_id, "admin signed out");
    }
    session.destroy().await?;
    Ok(Redirect::to("/login"))
}
