use serde::{Deserialize, Serialize};
use time::Date;
use uuid::Uuid;

use super::repo_types::Profile;
use crate::nutrients::personalize::Gender;
use crate::validation::{self, ValidationError};

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Body of POST and PUT /profile.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileRequest {
    #[serde(with = "iso_date")]
    pub birthdate: Date,
    pub height_cm: f64,
    pub weight_kg: f64,
    #[serde(default)]
    pub gender: Option<Gender>,
}

/// Biometrics that passed validation.
#[derive(Debug, Clone)]
pub struct ProfileInput {
    pub birthdate: Date,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub gender: Option<Gender>,
}

impl ProfileRequest {
    pub fn validate(self, today: Date) -> Result<ProfileInput, ValidationError> {
        Ok(ProfileInput {
            birthdate: validation::birthdate(self.birthdate, today)?,
            height_cm: validation::positive("height_cm", self.height_cm)?,
            weight_kg: validation::positive("weight_kg", self.weight_kg)?,
            gender: self.gender,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub id: Uuid,
    #[serde(with = "iso_date")]
    pub birthdate: Date,
    pub age: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub gender: Gender,
}

impl ProfileResponse {
    pub fn new(profile: &Profile, today: Date) -> Self {
        let bio = profile.biometrics(today);
        Self {
            id: profile.id,
            birthdate: profile.birthdate,
            age: bio.age,
            height_cm: bio.height_cm,
            weight_kg: bio.weight_kg,
            gender: bio.gender,
        }
    }
}

#[cfg(test)]
mod dto_tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn request_parses_iso_date_and_lowercase_gender() {
        let req: ProfileRequest = serde_json::from_str(
            r#"{"birthdate":"1990-01-10","height_cm":165,"weight_kg":60.5,"gender":"female"}"#,
        )
        .unwrap();
        assert_eq!(req.birthdate, date!(1990 - 01 - 10));
        assert_eq!(req.gender, Some(Gender::Female));
        let input = req.validate(date!(2024 - 05 - 10)).unwrap();
        assert_eq!(input.weight_kg, 60.5);
    }

    #[test]
    fn gender_is_optional() {
        let req: ProfileRequest =
            serde_json::from_str(r#"{"birthdate":"2000-02-29","height_cm":180,"weight_kg":75}"#)
                .unwrap();
        assert_eq!(req.gender, None);
    }

    #[test]
    fn validation_rejects_bad_biometrics() {
        let req = ProfileRequest {
            birthdate: date!(1990 - 01 - 10),
            height_cm: 0.0,
            weight_kg: 60.0,
            gender: None,
        };
        assert_eq!(
            req.validate(date!(2024 - 05 - 10)).unwrap_err(),
            ValidationError::NotPositive { field: "height_cm" }
        );

        let unborn = ProfileRequest {
            birthdate: date!(2030 - 01 - 01),
            height_cm: 170.0,
            weight_kg: 60.0,
            gender: None,
        };
        assert_eq!(
            unborn.validate(date!(2024 - 05 - 10)).unwrap_err(),
            ValidationError::FutureBirthdate
        );
    }

    #[test]
    fn response_derives_age() {
        let profile = Profile {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            birthdate: date!(1990 - 06 - 15),
            height_cm: 170.0,
            weight_kg: 70.0,
            gender: None,
            created_at: datetime!(2024-01-01 0:00 UTC),
            updated_at: datetime!(2024-01-01 0:00 UTC),
        };
        let resp = ProfileResponse::new(&profile, date!(2024 - 06 - 14));
        assert_eq!(resp.age, 33);
        assert_eq!(resp.gender, Gender::Other);
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"birthdate\":\"1990-06-15\""));
        assert!(json.contains("\"gender\":\"other\""));
    }
}
