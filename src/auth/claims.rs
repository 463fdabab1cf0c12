use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The identity service mints both kinds; this API accepts access tokens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    #[serde(alias = "Access")]
    Access,
    #[serde(alias = "Refresh")]
    Refresh,
}

/// Bearer token payload. `sub` is the account id; every profile, log item
/// and report is scoped by it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: usize,
    pub exp: usize,
    pub iss: String,
    pub aud: String,
    pub kind: TokenKind,
}

impl Claims {
    pub fn is_access(&self) -> bool {
        self.kind == TokenKind::Access
    }

    pub fn account_id(&self) -> Uuid {
        self.sub
    }
}
