use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use sqlx::{postgres::{PgPoolOptions, PgConnectOptions}, sqlite::{SqlitePoolOptions, SqliteJournalMode, SqliteConnectOptions}};
use sqlx::{PgPool, SqlitePool, ConnectOptions};
use tracing::info;
use tracing::log::LevelFilter;
use tera::Tera;

use crate::config::Config;
use crate::state::AppState;
use crate::domain::ports::{AdminRepository, AssetStore, EventRepository, RegistrationRepository, SessionStore};
use crate::domain::services::{
    auth_service::AuthService, event_editor::EventEditor, lifecycle::EventLifecycle,
    registration_service::RegistrationService,
};
use crate::infra::assets::fs_asset_store::FsAssetStore;
use crate::infra::session::memory_session_store::MemorySessionStore;
use crate::infra::repositories::{
    postgres_admin_repo::PostgresAdminRepo, postgres_event_repo::PostgresEventRepo,
    postgres_registration_repo::PostgresRegistrationRepo,
    sqlite_admin_repo::SqliteAdminRepo, sqlite_event_repo::SqliteEventRepo,
    sqlite_registration_repo::SqliteRegistrationRepo,
};

const TEMPLATES: [(&str, &str); 8] = [
    ("base.html", include_str!("../templates/base.html")),
    ("index.html", include_str!("../templates/index.html")),
    ("event.html", include_str!("../templates/event.html")),
    ("login.html", include_str!("../templates/login.html")),
    ("register.html", include_str!("../templates/register.html")),
    ("admin_dashboard.html", include_str!("../templates/admin_dashboard.html")),
    ("event_form.html", include_str!("../templates/event_form.html")),
    ("registrations.html", include_str!("../templates/registrations.html")),
];

pub fn load_templates() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_templates(TEMPLATES)?;
    tera.autoescape_on(vec![".html"]);
    Ok(tera)
}

/// Everything that is not tied to a specific database backend.
pub struct Backends {
    pub event_repo: Arc<dyn EventRepository>,
    pub registration_repo: Arc<dyn RegistrationRepository>,
    pub admin_repo: Arc<dyn AdminRepository>,
    pub session_store: Arc<dyn SessionStore>,
    pub asset_store: Arc<dyn AssetStore>,
}

pub fn assemble_state(config: &Config, backends: Backends) -> AppState {
    let Backends { event_repo, registration_repo, admin_repo, session_store, asset_store } = backends;

    let lifecycle = Arc::new(EventLifecycle::new(event_repo.clone(), registration_repo.clone()));
    let registration_service = Arc::new(RegistrationService::new(
        event_repo.clone(),
        registration_repo.clone(),
        lifecycle.clone(),
    ));
    let event_editor = Arc::new(EventEditor::new(event_repo.clone(), asset_store.clone(), config.timezone));
    let auth_service = Arc::new(AuthService::new(admin_repo.clone()));
    let templates = Arc::new(load_templates().expect("Failed to load page templates"));

    AppState {
        config: config.clone(),
        event_repo,
        registration_repo,
        admin_repo,
        session_store,
        asset_store,
        lifecycle,
        registration_service,
        event_editor,
        auth_service,
        templates,
    }
}

pub fn sqlite_backends(pool: SqlitePool, config: &Config) -> Backends {
    Backends {
        event_repo: Arc::new(SqliteEventRepo::new(pool.clone())),
        registration_repo: Arc::new(SqliteRegistrationRepo::new(pool.clone())),
        admin_repo: Arc::new(SqliteAdminRepo::new(pool)),
        session_store: Arc::new(MemorySessionStore::new()),
        asset_store: Arc::new(FsAssetStore::new(config.upload_dir.clone())),
    }
}

pub fn postgres_backends(pool: PgPool, config: &Config) -> Backends {
    Backends {
        event_repo: Arc::new(PostgresEventRepo::new(pool.clone())),
        registration_repo: Arc::new(PostgresRegistrationRepo::new(pool.clone())),
        admin_repo: Arc::new(PostgresAdminRepo::new(pool)),
        session_store: Arc::new(MemorySessionStore::new()),
        asset_store: Arc::new(FsAssetStore::new(config.upload_dir.clone())),
    }
}

pub async fn bootstrap_state(config: &Config) -> AppState {
    let database_url = &config.database_url;

    std::fs::create_dir_all(&config.upload_dir).expect("Failed to create upload directory");

    if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        info!("Initializing PostgreSQL connection...");

        let mut opts: PgConnectOptions = database_url.parse().expect("Invalid Postgres URL");
        opts = opts.log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_with(opts)
            .await
            .expect("Failed to connect to Postgres");

        run_postgres_migrations(&pool).await;

        assemble_state(config, postgres_backends(pool, config))
    } else {
        info!("Initializing SQLite connection with WAL Mode...");

        let opts = SqliteConnectOptions::from_str(database_url)
            .expect("Invalid SQLite connection string")
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .log_statements(LevelFilter::Debug)
            .log_slow_statements(LevelFilter::Warn, Duration::from_millis(500));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(opts)
            .await
            .expect("Failed to connect to SQLite");

        run_sqlite_migrations(&pool).await;

        assemble_state(config, sqlite_backends(pool, config))
    }
}

async fn run_postgres_migrations(pool: &PgPool) {
    sqlx::migrate!("./migrations/postgres")
        .run(pool)
        .await
        .expect("Failed to run Postgres migrations");
}

async fn run_sqlite_migrations(pool: &SqlitePool) {
    sqlx::migrate!("./migrations/sqlite")
        .run(pool)
        .await
        .expect("Failed to run SQLite migrations");
}
