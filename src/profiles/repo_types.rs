use sqlx::FromRow;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::nutrients::personalize::{age_on, BiometricProfile, Gender};

/// Profile record; one per account.
#[derive(Debug, Clone, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub birthdate: Date,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub gender: Option<String>, // M / F / O
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl Profile {
    /// Unset or unknown gender codes use the male/other formulas.
    pub fn gender(&self) -> Gender {
        self.gender
            .as_deref()
            .and_then(Gender::from_code)
            .unwrap_or(Gender::Other)
    }

    pub fn biometrics(&self, as_of: Date) -> BiometricProfile {
        BiometricProfile {
            age: age_on(self.birthdate, as_of),
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            gender: self.gender(),
        }
    }
}
