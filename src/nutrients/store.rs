use anyhow::Context;
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use time::{Date, OffsetDateTime};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::aggregate::{average_intake, ConsumptionEvent, Window};
use super::error::ReportError;
use super::personalize::{personalize, BiometricProfile};
use super::report::{build_report, NutrientReport};
use crate::foods::repo_types::FoodNutrientColumns;
use crate::profiles::repo_types::Profile;

/// Read access the report needs from persistence.
#[async_trait]
pub trait NutritionStore: Send + Sync {
    /// Biometrics with age computed as of `as_of`. `None` if the profile does not exist.
    async fn fetch_biometric_profile(
        &self,
        profile_id: Uuid,
        as_of: Date,
    ) -> anyhow::Result<Option<BiometricProfile>>;

    /// Events with `start <= consumed_at <= end`, in any order.
    async fn fetch_consumption_events(
        &self,
        profile_id: Uuid,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> anyhow::Result<Vec<ConsumptionEvent>>;
}

/// Personalized, ranked nutrient report for one profile and window.
///
/// Holds no state between calls; two windows for the same profile are
/// computed independently.
#[instrument(skip(store))]
pub async fn compute_nutrient_report<S>(
    store: &S,
    profile_id: Uuid,
    start: OffsetDateTime,
    end: OffsetDateTime,
) -> Result<NutrientReport, ReportError>
where
    S: NutritionStore + ?Sized,
{
    let profile = store
        .fetch_biometric_profile(profile_id, end.date())
        .await?
        .ok_or(ReportError::MissingProfile(profile_id))?;
    let ranges = personalize(&profile);

    let events = store
        .fetch_consumption_events(profile_id, start, end)
        .await?;
    let averages = average_intake(&events, Window::new(start, end));

    let report = build_report(&averages, &ranges);
    debug!(%profile_id, events = events.len(), worst = ?report.entries.first().map(|r| r.nutrient), "report built");
    Ok(report)
}

#[derive(Debug, FromRow)]
struct ConsumptionRow {
    consumed_at: OffsetDateTime,
    percent_consumed: Option<f64>,
    #[sqlx(flatten)]
    nutrients: FoodNutrientColumns,
}

/// `NutritionStore` backed by the application database.
#[derive(Clone)]
pub struct PgNutritionStore {
    db: PgPool,
}

impl PgNutritionStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl NutritionStore for PgNutritionStore {
    async fn fetch_biometric_profile(
        &self,
        profile_id: Uuid,
        as_of: Date,
    ) -> anyhow::Result<Option<BiometricProfile>> {
        let profile = sqlx::query_as::<_, Profile>(
            r#"
            SELECT id, user_id, birthdate, height_cm, weight_kg, gender, created_at, updated_at
            FROM profiles
            WHERE id = $1
            "#,
        )
        .bind(profile_id)
        .fetch_optional(&self.db)
        .await
        .context("fetch biometric profile")?;

        Ok(profile.map(|p| p.biometrics(as_of)))
    }

    async fn fetch_consumption_events(
        &self,
        profile_id: Uuid,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> anyhow::Result<Vec<ConsumptionEvent>> {
        let rows = sqlx::query_as::<_, ConsumptionRow>(
            r#"
            SELECT l.consumed_at, l.percent_consumed,
                   f.fat, f.saturated_fat, f.trans_fat, f.cholesterol, f.sodium,
                   f.carbohydrates, f.fiber, f.sugars, f.protein, f.calcium, f.iron,
                   f.potassium, f.magnesium, f.phosphorus, f.zinc, f.calories,
                   f.vitamin_c, f.vitamin_d
            FROM log_items l
            JOIN food_items f ON f.id = l.food_item_id
            WHERE l.profile_id = $1 AND l.consumed_at >= $2 AND l.consumed_at <= $3
            "#,
        )
        .bind(profile_id)
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await
        .context("fetch consumption events")?;

        Ok(rows
            .into_iter()
            .map(|r| ConsumptionEvent {
                consumed_at: r.consumed_at,
                percent_consumed: r.percent_consumed.unwrap_or(0.0),
                food: r.nutrients.into(),
            })
            .collect())
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use std::collections::HashMap;

    use super::*;
    use crate::nutrients::personalize::{age_on, Gender};

    /// In-memory store for exercising the report path without a database.
    #[derive(Default)]
    pub struct MemoryStore {
        pub profiles: HashMap<Uuid, (Date, f64, f64, Gender)>,
        pub events: HashMap<Uuid, Vec<ConsumptionEvent>>,
    }

    #[async_trait]
    impl NutritionStore for MemoryStore {
        async fn fetch_biometric_profile(
            &self,
            profile_id: Uuid,
            as_of: Date,
        ) -> anyhow::Result<Option<BiometricProfile>> {
            Ok(self
                .profiles
                .get(&profile_id)
                .map(|(born, height_cm, weight_kg, gender)| BiometricProfile {
                    age: age_on(*born, as_of),
                    height_cm: *height_cm,
                    weight_kg: *weight_kg,
                    gender: *gender,
                }))
        }

        async fn fetch_consumption_events(
            &self,
            profile_id: Uuid,
            start: OffsetDateTime,
            end: OffsetDateTime,
        ) -> anyhow::Result<Vec<ConsumptionEvent>> {
            // reversed to show the report does not rely on store ordering
            Ok(self
                .events
                .get(&profile_id)
                .map(|all| {
                    all.iter()
                        .rev()
                        .filter(|e| start <= e.consumed_at && e.consumed_at <= end)
                        .cloned()
                        .collect()
                })
                .unwrap_or_default())
        }
    }
}

#[cfg(test)]
mod store_tests {
    use super::memory::MemoryStore;
    use super::*;
    use crate::nutrients::personalize::Gender;
    use crate::nutrients::aggregate::NutrientValues;
    use crate::nutrients::deviation::deviation;
    use crate::nutrients::key::NutrientKey;
    use time::macros::{date, datetime};

    struct FailingStore;

    #[async_trait]
    impl NutritionStore for FailingStore {
        async fn fetch_biometric_profile(
            &self,
            _profile_id: Uuid,
            _as_of: Date,
        ) -> anyhow::Result<Option<BiometricProfile>> {
            anyhow::bail!("connection refused")
        }

        async fn fetch_consumption_events(
            &self,
            _profile_id: Uuid,
            _start: OffsetDateTime,
            _end: OffsetDateTime,
        ) -> anyhow::Result<Vec<ConsumptionEvent>> {
            Ok(Vec::new())
        }
    }

    fn seeded() -> (MemoryStore, Uuid) {
        let id = Uuid::new_v4();
        let mut store = MemoryStore::default();
        store
            .profiles
            .insert(id, (date!(1990 - 01 - 10), 165.0, 60.0, Gender::Female));
        let salty = NutrientValues {
            sodium: 1000.0,
            calories: 250.0,
            ..Default::default()
        };
        let shake = NutrientValues {
            protein: 10.0,
            ..Default::default()
        };
        store.events.insert(
            id,
            vec![
                ConsumptionEvent {
                    consumed_at: datetime!(2024-05-09 12:00 UTC),
                    percent_consumed: 0.5,
                    food: salty,
                },
                ConsumptionEvent {
                    consumed_at: datetime!(2024-05-04 08:00 UTC),
                    percent_consumed: 1.0,
                    food: shake,
                },
                ConsumptionEvent {
                    consumed_at: datetime!(2024-05-05 08:00 UTC),
                    percent_consumed: 2.0,
                    food: shake,
                },
            ],
        );
        (store, id)
    }

    #[tokio::test]
    async fn missing_profile_is_not_found() {
        let store = MemoryStore::default();
        let id = Uuid::new_v4();
        let err = compute_nutrient_report(
            &store,
            id,
            datetime!(2024-05-01 0:00 UTC),
            datetime!(2024-05-02 0:00 UTC),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ReportError::MissingProfile(p) if p == id));
        assert_eq!(err.status(), axum::http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn store_failure_propagates() {
        let err = compute_nutrient_report(
            &FailingStore,
            Uuid::new_v4(),
            datetime!(2024-05-01 0:00 UTC),
            datetime!(2024-05-02 0:00 UTC),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, ReportError::Store(_)));
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn day_and_week_views_are_independent() {
        let (store, id) = seeded();
        let end = datetime!(2024-05-10 0:00 UTC);

        let day = compute_nutrient_report(&store, id, end - time::Duration::days(1), end)
            .await
            .unwrap();
        let week = compute_nutrient_report(&store, id, end - time::Duration::days(7), end)
            .await
            .unwrap();

        assert_eq!(day.get(NutrientKey::Sodium).unwrap().value, 500.0);
        assert_eq!(day.get(NutrientKey::Protein).unwrap().value, 0.0);
        assert!((week.get(NutrientKey::Sodium).unwrap().value - 500.0 / 7.0).abs() < 1e-9);
        assert!((week.get(NutrientKey::Protein).unwrap().value - 30.0 / 7.0).abs() < 1e-9);

        let again = compute_nutrient_report(&store, id, end - time::Duration::days(1), end)
            .await
            .unwrap();
        assert_eq!(day, again);
    }

    #[tokio::test]
    async fn deviation_uses_personalized_ranges() {
        let (store, id) = seeded();
        let end = datetime!(2024-05-10 0:00 UTC);
        let report = compute_nutrient_report(&store, id, end - time::Duration::days(1), end)
            .await
            .unwrap();

        let profile = store
            .fetch_biometric_profile(id, end.date())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(profile.age, 34);
        let ranges = personalize(&profile);

        let iron = report.get(NutrientKey::Iron).unwrap();
        assert_eq!(iron.min_in, 18.0);
        assert_eq!(iron.deviation, deviation(0.0, ranges.get(NutrientKey::Iron)));

        let calories = report.get(NutrientKey::Calories).unwrap();
        assert_eq!(calories.value, 125.0);
        assert_eq!(
            calories.deviation,
            deviation(125.0, ranges.get(NutrientKey::Calories))
        );
    }

    #[tokio::test]
    async fn empty_window_reports_zero_values() {
        let (store, id) = seeded();
        let at = datetime!(2024-05-09 12:00 UTC);
        let report = compute_nutrient_report(&store, id, at, at).await.unwrap();
        assert!(report.entries.iter().all(|r| r.entry.value == 0.0));
    }
}
