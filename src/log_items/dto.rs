use serde::Deserialize;
use time::OffsetDateTime;

#[derive(Debug, Deserialize)]
pub struct CreateLogItemRequest {
    pub fdc_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub consumed_at: OffsetDateTime,
    /// Multiplier of the food's reference serving, 1.0 = one serving.
    pub percent_consumed: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdatePercentRequest {
    pub percent_consumed: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateDateRequest {
    #[serde(with = "time::serde::rfc3339")]
    pub consumed_at: OffsetDateTime,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub start: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub end: Option<OffsetDateTime>,
}
