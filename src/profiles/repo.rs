use anyhow::Context;
use sqlx::PgPool;
use uuid::Uuid;

use super::dto::ProfileInput;
use super::repo_types::Profile;

impl Profile {
    /// Profile owned by an account.
    pub async fn find_by_user(db: &PgPool, user_id: Uuid) -> anyhow::Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, user_id, birthdate, height_cm, weight_kg, gender, created_at, updated_at
            FROM profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await
        .context("find profile by user")?;
        Ok(profile)
    }

    /// Create the account's profile. `None` if it already has one.
    pub async fn create(
        db: &PgPool,
        user_id: Uuid,
        input: &ProfileInput,
    ) -> anyhow::Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            INSERT INTO profiles (user_id, birthdate, height_cm, weight_kg, gender)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id) DO NOTHING
            RETURNING id, user_id, birthdate, height_cm, weight_kg, gender, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(input.birthdate)
        .bind(input.height_cm)
        .bind(input.weight_kg)
        .bind(input.gender.map(|g| g.code()))
        .fetch_optional(db)
        .await
        .context("insert profile")?;
        Ok(profile)
    }

    /// Replace biometrics. `None` if the account has no profile.
    pub async fn update(
        db: &PgPool,
        user_id: Uuid,
        input: &ProfileInput,
    ) -> anyhow::Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            UPDATE profiles
               SET birthdate = $2, height_cm = $3, weight_kg = $4, gender = $5,
                   updated_at = now()
             WHERE user_id = $1
            RETURNING id, user_id, birthdate, height_cm, weight_kg, gender, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(input.birthdate)
        .bind(input.height_cm)
        .bind(input.weight_kg)
        .bind(input.gender.map(|g| g.code()))
        .fetch_optional(db)
        .await
        .context("update profile")?;
        Ok(profile)
    }
}
