use std::sync::Arc;
use crate::domain::ports::{
    AdminRepository, AssetStore, EventRepository, RegistrationRepository, SessionStore,
};
use crate::domain::services::{
    auth_service::AuthService, event_editor::EventEditor, lifecycle::EventLifecycle,
    registration_service::RegistrationService,
};
use crate::config::Config;
use tera::Tera;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub event_repo: Arc<dyn EventRepository>,
    pub registration_repo: Arc<dyn RegistrationRepository>,
    pub admin_repo: Arc<dyn AdminRepository>,
    pub session_store: Arc<dyn SessionStore>,
    pub asset_store: Arc<dyn AssetStore>,
    pub lifecycle: Arc<EventLifecycle>,
    pub registration_service: Arc<RegistrationService>,
    pub event_editor: Arc<EventEditor>,
    pub auth_service: Arc<AuthService>,
    pub templates: Arc<Tera>,
}
