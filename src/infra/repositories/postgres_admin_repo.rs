use crate::domain::{models::admin::Admin, ports::AdminRepository};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::PgPool;

pub struct PostgresAdminRepo {
    pool: PgPool,
}

impl PostgresAdminRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AdminRepository for PostgresAdminRepo {
    async fn create(&self, admin: &Admin) -> Result<Admin, AppError> {
        sqlx::query_as::<_, Admin>("INSERT INTO admins (id, name, email, password_hash, created_at) VALUES ($1, $2, $3, $4, $5) RETURNING *")
            .bind(&admin.id).bind(&admin.name).bind(&admin.email).bind(&admin.password_hash).bind(admin.created_at)
            .fetch_one(&self.pool).await.map_err(AppError::Database)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, AppError> {
        sqlx::query_as::<_, Admin>("SELECT * FROM admins WHERE lower(email) = lower($1)").bind(email).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }
}
