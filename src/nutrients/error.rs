use axum::http::StatusCode;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("profile {0} not found")]
    MissingProfile(Uuid),

    #[error("window end {end} is before start {start}")]
    InvalidWindow {
        start: OffsetDateTime,
        end: OffsetDateTime,
    },

    #[error("nutrition store failure: {0}")]
    Store(#[from] anyhow::Error),
}

impl ReportError {
    pub fn status(&self) -> StatusCode {
        match self {
            ReportError::MissingProfile(_) => StatusCode::NOT_FOUND,
            ReportError::InvalidWindow { .. } => StatusCode::BAD_REQUEST,
            ReportError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ReportError> for (StatusCode, String) {
    fn from(e: ReportError) -> Self {
        (e.status(), e.to_string())
    }
}
