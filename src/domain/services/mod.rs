pub mod auth_service;
pub mod csrf;
pub mod event_editor;
pub mod lifecycle;
pub mod registration_service;
pub mod validation;
