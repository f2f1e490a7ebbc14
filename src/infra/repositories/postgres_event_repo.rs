use crate::domain::{models::event::Event, ports::EventRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

pub struct PostgresEventRepo {
    pool: PgPool,
}

impl PostgresEventRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PostgresEventRepo {
    async fn create(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"INSERT INTO events (
                id, title, description, category, event_datetime, location, max_seats, status, image, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING *"#
        )
            .bind(&event.id)
            .bind(&event.title)
            .bind(&event.description)
            .bind(&event.category)
            .bind(event.event_datetime)
            .bind(&event.location)
            .bind(event.max_seats)
            .bind(event.status.as_str())
            .bind(&event.image)
            .bind(event.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::Database)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events WHERE id = $1").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list(&self) -> Result<Vec<Event>, AppError> {
        sqlx::query_as::<_, Event>("SELECT * FROM events ORDER BY event_datetime DESC").fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn update(&self, event: &Event) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(
            r#"UPDATE events SET
                title = $1, description = $2, category = $3, event_datetime = $4,
                location = $5, max_seats = $6, status = $7, image = $8
            WHERE id = $9
            RETURNING *"#
        )
            .bind(&event.title)
            .bind(&event.description)
            .bind(&event.category)
            .bind(event.event_datetime)
            .bind(&event.location)
            .bind(event.max_seats)
            .bind(event.status.as_str())
            .bind(&event.image)
            .bind(&event.id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::Database)?
            .ok_or(AppError::NotFound("Event not found.".into()))
    }

    async fn close_if_open(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("UPDATE events SET status = 'closed' WHERE id = $1 AND status = 'open'").bind(id).execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.rows_affected() > 0)
    }

    async fn close_past_events(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query("UPDATE events SET status = 'closed' WHERE status = 'open' AND event_datetime <= $1").bind(now).execute(&self.pool).await.map_err(AppError::Database)?;
        Ok(result.rows_affected())
    }

    async fn delete_with_registrations(&self, id: &str) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;
        let registrations = sqlx::query("DELETE FROM registrations WHERE event_id = $1").bind(id).execute(&mut *tx).await.map_err(AppError::Database)?;
        let event = sqlx::query("DELETE FROM events WHERE id = $1").bind(id).execute(&mut *tx).await.map_err(AppError::Database)?;
        if event.rows_affected() == 0 { return Err(AppError::NotFound("Event not found.".into())); }
        tx.commit().await.map_err(AppError::Database)?;
        Ok(registrations.rows_affected())
    }
}
