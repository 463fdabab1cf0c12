use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Log entry joined with the food it references.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct LogItemRow {
    pub id: Uuid,
    pub fdc_id: i64,
    pub food_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub consumed_at: OffsetDateTime,
    pub percent_consumed: f64,
}
