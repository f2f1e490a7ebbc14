use std::env;
use std::path::PathBuf;
use chrono_tz::Tz;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub upload_dir: PathBuf,
    pub timezone: Tz,
    pub session_ttl_minutes: i64,
    pub cookie_secure: bool,
    pub max_upload_bytes: usize,
    pub maintenance_interval_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();

        Self {
            database_url: env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://event_portal.db".to_string()),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            upload_dir: PathBuf::from(env::var("UPLOAD_DIR").unwrap_or_else(|_| "./uploads/images".to_string())),
            timezone: env::var("TIMEZONE").unwrap_or_else(|_| "UTC".to_string()).parse().expect("TIMEZONE must be an IANA time zone name"),
            session_ttl_minutes: env::var("SESSION_TTL_MINUTES").unwrap_or_else(|_| "120".to_string()).parse().expect("SESSION_TTL_MINUTES must be a number"),
            cookie_secure: env::var("COOKIE_SECURE").map(|v| v != "false" && v != "0").unwrap_or(true),
            max_upload_bytes: env::var("MAX_UPLOAD_BYTES").unwrap_or_else(|_| (5 * 1024 * 1024).to_string()).parse().expect("MAX_UPLOAD_BYTES must be a number"),
            maintenance_interval_secs: env::var("MAINTENANCE_INTERVAL_SECS").unwrap_or_else(|_| "60".to_string()).parse().expect("MAINTENANCE_INTERVAL_SECS must be a number"),
        }
    }
}
