use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use std::sync::Arc;
use tracing::Span;
use crate::api::extractors::session::CurrentSession;
use crate::domain::models::session::{AdminIdentity, AuthState};
use crate::error::AppError;
use crate::state::AppState;

/// Session of a logged-in admin. Anonymous requests are redirected to `/login`.
pub struct AdminSession {
    pub identity: AdminIdentity,
    pub session: CurrentSession,
}

impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = CurrentSession::from_request_parts(parts, state).await?;

        let AuthState::Authenticated(identity) = session.auth_state() else {
            return Err(AppError::Unauthorized);
        };

        Span::current().record("admin_id", &identity.admin_id);

        Ok(AdminSession { identity, session })
    }
}
