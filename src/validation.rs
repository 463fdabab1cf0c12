use axum::http::StatusCode;
use time::{Date, OffsetDateTime};

/// Largest accepted serving multiplier.
pub const MAX_PERCENT_CONSUMED: f64 = 1000.0;

/// Rejected input on a write path.
#[derive(Debug, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("percent_consumed is required")]
    MissingPercent,
    #[error("percent must be between 0 and 1000, got {0}")]
    PercentOutOfRange(f64),
    #[error("date cannot be in the future")]
    FutureDate,
    #[error("birthdate cannot be in the future")]
    FutureBirthdate,
    #[error("{field} must be a positive number")]
    NotPositive { field: &'static str },
}

impl From<ValidationError> for (StatusCode, String) {
    fn from(e: ValidationError) -> Self {
        (StatusCode::BAD_REQUEST, e.to_string())
    }
}

/// Serving multiplier accepted into the log: present and within [0, 1000].
pub fn percent_consumed(value: Option<f64>) -> Result<f64, ValidationError> {
    let value = value.ok_or(ValidationError::MissingPercent)?;
    if !(0.0..=MAX_PERCENT_CONSUMED).contains(&value) {
        return Err(ValidationError::PercentOutOfRange(value));
    }
    Ok(value)
}

pub fn consumed_at(at: OffsetDateTime, now: OffsetDateTime) -> Result<OffsetDateTime, ValidationError> {
    if at > now {
        return Err(ValidationError::FutureDate);
    }
    Ok(at)
}

pub fn birthdate(born: Date, today: Date) -> Result<Date, ValidationError> {
    if born > today {
        return Err(ValidationError::FutureBirthdate);
    }
    Ok(born)
}

pub fn positive(field: &'static str, value: f64) -> Result<f64, ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ValidationError::NotPositive { field })
    }
}
