use anyhow::Result;
use uuid::Uuid;

use crate::domain::video::{NewVideo, Video};
use crate::infra::db::Db;

/// Relational index of stored videos. Insert and list only; rows are never
/// updated or deleted.
#[axum::async_trait]
pub trait VideoStore: Send + Sync {
    async fn insert(&self, video: NewVideo) -> Result<Video>;

    /// All rows, newest creation timestamp first.
    async fn list_all(&self) -> Result<Vec<Video>>;
}

#[derive(Clone)]
pub struct PgVideoStore {
    db: Db,
}

impl PgVideoStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[axum::async_trait]
impl VideoStore for PgVideoStore {
    async fn insert(&self, video: NewVideo) -> Result<Video> {
        let row = sqlx::query_as::<_, Video>(
            "INSERT INTO videos (id, title, description, public_id, duration, original_size, compressed_size) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING id, title, description, public_id, duration, original_size, compressed_size, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(&video.title)
        .bind(&video.description)
        .bind(&video.public_id)
        .bind(video.duration)
        .bind(video.original_size)
        .bind(video.compressed_size)
        .fetch_one(self.db.pool())
        .await?;
        Ok(row)
    }

    async fn list_all(&self) -> Result<Vec<Video>> {
        let rows = sqlx::query_as::<_, Video>(
            "SELECT id, title, description, public_id, duration, original_size, compressed_size, created_at \
             FROM videos ORDER BY created_at DESC",
        )
        .fetch_all(self.db.pool())
        .await?;
        Ok(rows)
    }
}
