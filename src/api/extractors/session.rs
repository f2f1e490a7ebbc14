use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use chrono::Utc;
use rand::RngCore;
use std::sync::Arc;
use time::Duration;
use tower_cookies::cookie::SameSite;
use tower_cookies::{Cookie, Cookies};
use tracing::debug;
use crate::domain::models::session::{AdminIdentity, AuthState, Flash, SessionData};
use crate::domain::ports::SessionStore;
use crate::domain::services::csrf;
use crate::error::AppError;
use crate::state::AppState;

pub const SESSION_COOKIE: &str = "portal_session";

/// Server-side session for the current request. Changes are only persisted by `save`.
pub struct CurrentSession {
    id: String,
    data: SessionData,
    cookies: Cookies,
    store: Arc<dyn SessionStore>,
    ttl_minutes: i64,
    secure: bool,
}

fn new_session_id() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);

        let cookies = parts.extensions.get::<Cookies>()
            .cloned()
            .ok_or(AppError::InternalWithMsg("cookie layer missing".into()))?;

        let ttl_minutes = app_state.config.session_ttl_minutes;
        let existing = match cookies.get(SESSION_COOKIE) {
            Some(cookie) => {
                let id = cookie.value().to_string();
                app_state.session_store.load(&id).await?.map(|data| (id, data))
            }
            None => None,
        };

        let (id, data) = existing.unwrap_or_else(|| {
            debug!("starting new session");
            (new_session_id(), SessionData::new(Utc::now() + chrono::Duration::minutes(ttl_minutes)))
        });

        Ok(CurrentSession {
            id,
            data,
            cookies,
            store: app_state.session_store.clone(),
            ttl_minutes,
            secure: app_state.config.cookie_secure,
        })
    }
}

impl CurrentSession {
    pub fn auth_state(&self) -> AuthState {
        self.data.auth_state()
    }

    pub fn admin(&self) -> Option<&AdminIdentity> {
        self.data.admin.as_ref()
    }

    pub fn csrf_token(&mut self) -> String {
        csrf::issue_token(&mut self.data)
    }

    /// Rejects the request with `Forbidden` unless the supplied token matches the session's.
    pub fn verify_csrf(&self, supplied: Option<&str>) -> Result<(), AppError> {
        if csrf::verify(&self.data, supplied) {
            Ok(())
        } else {
            debug!("csrf token rejected");
            Err(AppError::Forbidden(csrf::CSRF_FAILURE.to_string()))
        }
    }

    pub fn flash_error(&mut self, message: impl Into<String>) {
        self.data.flash_error = Some(message.into());
    }

    pub fn flash_success(&mut self, message: impl Into<String>) {
        self.data.flash_success = Some(message.into());
    }

    pub fn take_flash(&mut self) -> Flash {
        self.data.take_flash()
    }

    /// Binds the admin to a fresh session id and drops the anonymous one,
    /// along with its CSRF token.
    pub async fn sign_in(&mut self, identity: AdminIdentity) -> Result<(), AppError> {
        self.store.destroy(&self.id).await?;
        self.id = new_session_id();
        self.data.csrf_token = None;
        self.data.admin = Some(identity);
        Ok(())
    }

    pub async fn destroy(self) -> Result<(), AppError> {
        self.store.destroy(&self.id).await?;
        self.cookies.remove(Cookie::build((SESSION_COOKIE, "")).path("/").into());
        Ok(())
    }

    /// Persists the session, sliding its expiry forward, and (re)issues the cookie.
    pub async fn save(&mut self) -> Result<(), AppError> {
        self.data.expires_at = Utc::now() + chrono::Duration::minutes(self.ttl_minutes);
        self.store.save(&self.id, &self.data).await?;

        let mut cookie = Cookie::new(SESSION_COOKIE, self.id.clone());
        cookie.set_http_only(true);
        cookie.set_secure(self.secure);
        cookie.set_same_site(SameSite::Lax);
        cookie.set_path("/");
        cookie.set_max_age(Duration::minutes(self.ttl_minutes));
        self.cookies.add(cookie);
        Ok(())
    }
}
