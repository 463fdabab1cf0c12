use anyhow::Context;
use sqlx::PgPool;

use super::lookup::FoodItem;
use super::repo_types::FoodItemRow;

const FOOD_COLUMNS: &str = r#"
    id, fdc_id, name,
    fat, saturated_fat, trans_fat, cholesterol, sodium, carbohydrates, fiber,
    sugars, protein, calcium, iron, potassium, magnesium, phosphorus, zinc,
    calories, vitamin_c, vitamin_d
"#;

/// Insert a food into the catalog unless its external id is already known.
/// Cached foods are never overwritten.
pub async fn insert_if_absent(db: &PgPool, food: &FoodItem) -> anyhow::Result<()> {
    let n = &food.nutrients;
    sqlx::query(
        r#"
        INSERT INTO food_items (
            fdc_id, name,
            fat, saturated_fat, trans_fat, cholesterol, sodium, carbohydrates, fiber,
            sugars, protein, calcium, iron, potassium, magnesium, phosphorus, zinc,
            calories, vitamin_c, vitamin_d
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11,
                $12, $13, $14, $15, $16, $17, $18, $19, $20)
        ON CONFLICT (fdc_id) DO NOTHING
        "#,
    )
    .bind(food.fdc_id)
    .bind(&food.name)
    .bind(n.fat)
    .bind(n.saturated_fat)
    .bind(n.trans_fat)
    .bind(n.cholesterol)
    .bind(n.sodium)
    .bind(n.carbohydrates)
    .bind(n.fiber)
    .bind(n.sugars)
    .bind(n.protein)
    .bind(n.calcium)
    .bind(n.iron)
    .bind(n.potassium)
    .bind(n.magnesium)
    .bind(n.phosphorus)
    .bind(n.zinc)
    .bind(n.calories)
    .bind(n.vitamin_c)
    .bind(n.vitamin_d)
    .execute(db)
    .await
    .with_context(|| format!("insert food {}", food.fdc_id))?;
    Ok(())
}

/// Catalog entry for an external id, if cached.
pub async fn find_by_fdc_id(db: &PgPool, fdc_id: i64) -> anyhow::Result<Option<FoodItemRow>> {
    let row = sqlx::query_as::<_, FoodItemRow>(&format!(
        "SELECT {FOOD_COLUMNS} FROM food_items WHERE fdc_id = $1"
    ))
    .bind(fdc_id)
    .fetch_optional(db)
    .await
    .context("find food by fdc_id")?;
    Ok(row)
}
