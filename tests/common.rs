use event_portal::{
    api::router::create_router,
    config::Config,
    domain::models::{
        admin::AdminSignup,
        event::{Event, EventFields, EventStatus},
        registration::Registration,
    },
    infra::factory::{assemble_state, sqlite_backends},
    state::AppState,
};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use sqlx::{sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions}, Pool, Sqlite};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "secret123";

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub upload_dir: PathBuf,
    pub state: Arc<AppState>,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(10));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let upload_dir = std::env::temp_dir().join(format!("event_portal_uploads_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&upload_dir).unwrap();

        let config = Config {
            database_url: db_url,
            port: 0,
            upload_dir: upload_dir.clone(),
            timezone: chrono_tz::UTC,
            session_ttl_minutes: 30,
            cookie_secure: false,
            max_upload_bytes: 2 * 1024 * 1024,
            maintenance_interval_secs: 60,
        };

        let state = Arc::new(assemble_state(&config, sqlite_backends(pool.clone(), &config)));
        let router = create_router(state.clone());

        Self { router, pool, db_filename, upload_dir, state }
    }

    pub fn browser(&self) -> Browser {
        Browser { router: self.router.clone(), cookie: None }
    }

    pub async fn seed_event(&self, title: &str, when: DateTime<Utc>, max_seats: i32, status: EventStatus) -> Event {
        let fields = EventFields {
            title: title.to_string(),
            description: format!("All about {}", title),
            category: "Workshop".to_string(),
            event_datetime: when,
            location: "Main Hall".to_string(),
            max_seats,
            status,
        };
        self.state.event_repo.create(&Event::new(fields, None)).await.unwrap()
    }

    pub async fn seed_registration(&self, event_id: &str, name: &str) -> Registration {
        let registration = Registration::new(
            event_id.to_string(),
            name.to_string(),
            format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            "5551234567".to_string(),
        );
        self.state.registration_repo.create_within_capacity(&registration).await.unwrap()
            .expect("event had no capacity left")
    }

    pub async fn create_admin(&self) {
        let signup = AdminSignup {
            name: Some("Ada Admin".into()),
            email: Some(ADMIN_EMAIL.into()),
            password: Some(ADMIN_PASSWORD.into()),
            confirm_password: Some(ADMIN_PASSWORD.into()),
        };
        self.state.auth_service.register_admin(&signup).await.unwrap();
    }

    /// A browser that has registered and signed in as the admin.
    pub async fn admin_browser(&self) -> Browser {
        self.create_admin().await;
        let mut browser = self.browser();
        let page = browser.get("/login").await;
        let token = page.csrf_token();
        let response = browser.post_form("/login", &[
            ("email", ADMIN_EMAIL),
            ("password", ADMIN_PASSWORD),
            ("csrf_token", &token),
        ]).await;
        assert_eq!(response.location.as_deref(), Some("/admin-dashboard"), "login failed: {}", response.body);
        browser
    }

    pub async fn registration_count(&self, event_id: &str) -> i64 {
        self.state.registration_repo.count_by_event(event_id).await.unwrap()
    }

    pub fn stored_files(&self) -> Vec<String> {
        std::fs::read_dir(&self.upload_dir)
            .map(|entries| entries.filter_map(|e| e.ok()).map(|e| e.file_name().to_string_lossy().into_owned()).collect())
            .unwrap_or_default()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
        let _ = std::fs::remove_file(format!("{}-wal", self.db_filename));
        let _ = std::fs::remove_file(format!("{}-shm", self.db_filename));
        let _ = std::fs::remove_dir_all(&self.upload_dir);
    }
}

#[allow(dead_code)]
pub struct TestResponse {
    pub status: StatusCode,
    pub location: Option<String>,
    pub body: String,
}

#[allow(dead_code)]
impl TestResponse {
    fn value_after(&self, marker: &str) -> Option<String> {
        let start = self.body.find(marker)? + marker.len();
        let end = self.body[start..].find(['"', '&'])?;
        Some(self.body[start..start + end].to_string())
    }

    pub fn csrf_token(&self) -> String {
        self.value_after(r#"name="csrf_token" value=""#)
            .or_else(|| self.value_after("csrf_token="))
            .expect("page carries no csrf token")
    }
}

#[allow(dead_code)]
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File { name: &'a str, file_name: &'a str, content_type: &'a str, bytes: &'a [u8] },
}

const BOUNDARY: &str = "----event-portal-test-boundary";

#[allow(dead_code)]
pub fn multipart_body(parts: &[Part]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes());
                body.extend_from_slice(value.as_bytes());
            }
            Part::File { name, file_name, content_type, bytes } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                        name, file_name, content_type
                    ).as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

#[allow(dead_code)]
fn form_encode(pairs: &[(&str, &str)]) -> String {
    fn encode(raw: &str) -> String {
        raw.bytes()
            .map(|b| match b {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => (b as char).to_string(),
                _ => format!("%{:02X}", b),
            })
            .collect()
    }
    pairs.iter().map(|(k, v)| format!("{}={}", encode(k), encode(v))).collect::<Vec<_>>().join("&")
}

/// Drives the router while carrying the session cookie between requests.
pub struct Browser {
    router: Router,
    pub cookie: Option<String>,
}

#[allow(dead_code)]
impl Browser {
    async fn send(&mut self, builder: axum::http::request::Builder, body: Body) -> TestResponse {
        let builder = match &self.cookie {
            Some(value) => builder.header(header::COOKIE, format!("portal_session={}", value)),
            None => builder,
        };
        let response = self.router.clone().oneshot(builder.body(body).unwrap()).await.unwrap();

        for set_cookie in response.headers().get_all(header::SET_COOKIE) {
            let raw = set_cookie.to_str().unwrap();
            if let Some(rest) = raw.strip_prefix("portal_session=") {
                let value = rest.split(';').next().unwrap_or_default();
                self.cookie = if value.is_empty() { None } else { Some(value.to_string()) };
            }
        }

        let status = response.status();
        let location = response.headers().get(header::LOCATION).map(|v| v.to_str().unwrap().to_string());
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        TestResponse { status, location, body: String::from_utf8_lossy(&bytes).into_owned() }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Request::builder().method("GET").uri(uri), Body::empty()).await
    }

    pub async fn post_form(&mut self, uri: &str, pairs: &[(&str, &str)]) -> TestResponse {
        let builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        self.send(builder, Body::from(form_encode(pairs))).await
    }

    pub async fn post_multipart(&mut self, uri: &str, parts: &[Part<'_>]) -> TestResponse {
        let builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={}", BOUNDARY));
        self.send(builder, Body::from(multipart_body(parts))).await
    }
}
