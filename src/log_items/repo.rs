use anyhow::Context;
use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::LogItemRow;

const SELECT_LOG_ITEM: &str = r#"
    SELECT l.id, f.fdc_id, f.name AS food_name, l.consumed_at, l.percent_consumed
    FROM log_items l
    JOIN food_items f ON f.id = l.food_item_id
"#;

/// Record a validated consumption event.
pub async fn insert(
    db: &PgPool,
    profile_id: Uuid,
    food_item_id: Uuid,
    consumed_at: OffsetDateTime,
    percent_consumed: f64,
) -> anyhow::Result<Uuid> {
    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO log_items (profile_id, food_item_id, consumed_at, percent_consumed)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(profile_id)
    .bind(food_item_id)
    .bind(consumed_at)
    .bind(percent_consumed)
    .fetch_one(db)
    .await
    .context("insert log item")?;
    Ok(id)
}

/// One of the profile's log items.
pub async fn find(db: &PgPool, profile_id: Uuid, id: Uuid) -> anyhow::Result<Option<LogItemRow>> {
    let row = sqlx::query_as::<_, LogItemRow>(&format!(
        "{SELECT_LOG_ITEM} WHERE l.id = $1 AND l.profile_id = $2"
    ))
    .bind(id)
    .bind(profile_id)
    .fetch_optional(db)
    .await
    .context("find log item")?;
    Ok(row)
}

/// The profile's log items in `[start, end]`, newest first.
pub async fn list_in_window(
    db: &PgPool,
    profile_id: Uuid,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> anyhow::Result<Vec<LogItemRow>> {
    let rows = sqlx::query_as::<_, LogItemRow>(&format!(
        r#"{SELECT_LOG_ITEM}
        WHERE l.profile_id = $1 AND l.consumed_at >= $2 AND l.consumed_at <= $3
        ORDER BY l.consumed_at DESC"#
    ))
    .bind(profile_id)
    .bind(start)
    .bind(end)
    .fetch_all(db)
    .await
    .context("list log items")?;
    Ok(rows)
}

/// Returns false when the item does not exist or belongs to another profile.
pub async fn update_percent(
    db: &PgPool,
    profile_id: Uuid,
    id: Uuid,
    percent_consumed: f64,
) -> anyhow::Result<bool> {
    let done = sqlx::query(
        "UPDATE log_items SET percent_consumed = $3 WHERE id = $1 AND profile_id = $2",
    )
    .bind(id)
    .bind(profile_id)
    .bind(percent_consumed)
    .execute(db)
    .await
    .context("update log item percent")?;
    Ok(done.rows_affected() == 1)
}

pub async fn update_consumed_at(
    db: &PgPool,
    profile_id: Uuid,
    id: Uuid,
    consumed_at: OffsetDateTime,
) -> anyhow::Result<bool> {
    let done = sqlx::query(
        "UPDATE log_items SET consumed_at = $3 WHERE id = $1 AND profile_id = $2",
    )
    .bind(id)
    .bind(profile_id)
    .bind(consumed_at)
    .execute(db)
    .await
    .context("update log item date")?;
    Ok(done.rows_affected() == 1)
}

pub async fn delete(db: &PgPool, profile_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
    let done = sqlx::query("DELETE FROM log_items WHERE id = $1 AND profile_id = $2")
        .bind(id)
        .bind(profile_id)
        .execute(db)
        .await
        .context("delete log item")?;
    Ok(done.rows_affected() == 1)
}
