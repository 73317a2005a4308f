use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// A stored video row. Immutable once inserted; `created_at` is the sole
/// sort key for gallery listings.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub public_id: String,
    pub duration: f64,
    pub original_size: i64,
    pub compressed_size: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Fields for a row about to be inserted. `public_id`, `duration` and
/// `compressed_size` come from the media sink, the rest from the caller.
#[derive(Debug, Clone)]
pub struct NewVideo {
    pub title: String,
    pub description: String,
    pub public_id: String,
    pub duration: f64,
    pub original_size: i64,
    pub compressed_size: i64,
}
