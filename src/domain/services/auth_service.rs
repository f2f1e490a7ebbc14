use std::sync::Arc;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::info;
use crate::domain::{
    models::{admin::{Admin, AdminSignup}, session::AdminIdentity},
    ports::AdminRepository,
};
use crate::domain::services::validation::{is_valid_email, is_valid_name, required};
use crate::error::AppError;

/// Counted in characters, not bytes.
pub const MIN_PASSWORD_LEN: usize = 6;

pub struct AuthService {
    admins: Arc<dyn AdminRepository>,
}

impl AuthService {
    pub fn new(admins: Arc<dyn AdminRepository>) -> Self {
        Self { admins }
    }

    /// Email lookup plus password verification. Any mismatch is `Unauthorized`.
    pub async fn authenticate(&self, email: Option<&str>, password: Option<&str>) -> Result<Admin, AppError> {
        let email = email.map(str::trim).unwrap_or_default();
        let password = password.unwrap_or_default();

        if email.is_empty() || password.is_empty() {
            return Err(AppError::validation("Email and password are required."));
        }
        if !is_valid_email(email) {
            return Err(AppError::validation("Invalid email format."));
        }

        let admin = self.admins.find_by_email(&email.to_lowercase()).await?
            .ok_or(AppError::Unauthorized)?;

        let parsed_hash = PasswordHash::new(&admin.password_hash)
            .map_err(|_| AppError::Internal)?;

        Argon2::default().verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AppError::Unauthorized)?;

        info!("Admin authenticated: {}", admin.id);
        Ok(admin)
    }

    pub async fn register_admin(&self, signup: &AdminSignup) -> Result<Admin, AppError> {
        let mut errors = Vec::new();

        let name = required(signup.name.as_deref(), "Name", &mut errors);
        if let Some(ref n) = name
            && !is_valid_name(n) {
            errors.push("Name should only contain letters and spaces.".to_string());
        }

        let email = required(signup.email.as_deref(), "Email", &mut errors);
        if let Some(ref e) = email
            && !is_valid_email(e) {
            errors.push("Invalid email format.".to_string());
        }

        let password = match signup.password.as_deref() {
            None => {
                errors.push("Password is missing.".to_string());
                None
            }
            Some("") => {
                errors.push("Password is required.".to_string());
                None
            }
            Some(p) if p.chars().count() < MIN_PASSWORD_LEN => {
                errors.push(format!("Password must be at least {} characters long.", MIN_PASSWORD_LEN));
                None
            }
            Some(p) => Some(p),
        };

        if let Some(p) = password
            && signup.confirm_password.as_deref() != Some(p) {
            errors.push("Passwords do not match.".to_string());
        }

        let (Some(name), Some(email), Some(password)) = (name, email, password) else {
            return Err(AppError::Validation(errors));
        };
        if !errors.is_empty() {
            return Err(AppError::Validation(errors));
        }

        // Addresses are compared and stored case-insensitively.
        let email = email.to_lowercase();
        if self.admins.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered.".into()));
        }

        let admin = Admin::new(name, email, hash_password(password)?);
        let created = self.admins.create(&admin).await.map_err(|e| {
            if e.is_unique_violation() {
                AppError::Conflict("Email already registered.".into())
            } else {
                e
            }
        })?;

        info!("Registered admin: {}", created.id);
        Ok(created)
    }
}

pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AppError::Internal)
}

pub fn identity_of(admin: &Admin) -> AdminIdentity {
    AdminIdentity {
        admin_id: admin.id.clone(),
        email: admin.email.clone(),
        name: admin.name.clone(),
    }
}
