use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use thiserror::Error;
use tracing::error;

pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
    #[error("Template error: {0}")]
    Template(#[from] tera::Error),
    #[error("Resource not found: {0}")]
    NotFound(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Invalid input: {}", .0.join(" "))]
    Validation(Vec<String>),
    #[error("Internal server error")]
    Internal,
    #[error("Internal server error: {0}")]
    InternalWithMsg(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(vec![message.into()])
    }

    /// 2067 = SQLite unique constraint, 23505 = PostgreSQL unique violation.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            AppError::Database(e) => e
                .as_database_error()
                .and_then(|db_err| db_err.code())
                .is_some_and(|code| code == "2067" || code == "23505"),
            _ => false,
        }
    }

    /// Message that is safe to show to the visitor.
    pub fn user_message(&self) -> String {
        match self {
            AppError::NotFound(msg) | AppError::Forbidden(msg) | AppError::Conflict(msg) => msg.clone(),
            AppError::Validation(messages) => messages.join(" "),
            AppError::Unauthorized => "Please log in to continue.".to_string(),
            AppError::Database(_)
            | AppError::Storage(_)
            | AppError::Template(_)
            | AppError::Internal
            | AppError::InternalWithMsg(_) => GENERIC_FAILURE.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Unauthorized => return Redirect::to("/login").into_response(),
            AppError::NotFound(_) => return Redirect::to("/").into_response(),
            AppError::Database(_) if self.is_unique_violation() => StatusCode::CONFLICT,
            AppError::Database(e) => {
                error!("Database error: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Storage(e) => {
                error!("Storage error: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Template(e) => {
                error!("Template error: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::InternalWithMsg(msg) => {
                error!("Internal error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
        };

        let message = if self.is_unique_violation() {
            "Resource already exists.".to_string()
        } else {
            self.user_message()
        };

        let body = format!(
            "<!DOCTYPE html><html><head><title>Event Portal</title></head>\
             <body><p class=\"message error\">{}</p><p><a href=\"/\">Back to Events</a></p></body></html>",
            escape_html(&message)
        );

        (status, Html(body)).into_response()
    }
}

fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
