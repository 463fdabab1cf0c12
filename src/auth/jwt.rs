use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use tracing::{debug, warn};
use uuid::Uuid;

use super::claims::Claims;
#[cfg(test)]
use super::claims::TokenKind;
use crate::config::JwtConfig;
use crate::state::AppState;

/// Verification key and expected issuer/audience.
#[derive(Clone)]
pub struct JwtKeys {
    pub decoding: DecodingKey,
    pub issuer: String,
    pub audience: String,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        let JwtConfig {
            secret,
            issuer,
            audience,
        } = state.config.jwt.clone();
        Self {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            issuer,
            audience,
        }
    }
}

impl JwtKeys {
    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::default();
        validation.set_audience(std::slice::from_ref(&self.audience));
        validation.set_issuer(std::slice::from_ref(&self.issuer));
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(user_id = %data.claims.sub, kind = ?data.claims.kind, "jwt verified");
        Ok(data.claims)
    }

    pub fn verify_access(&self, token: &str) -> anyhow::Result<Claims> {
        let claims = self.verify(token)?;
        if !claims.is_access() {
            anyhow::bail!("not an access token");
        }
        Ok(claims)
    }
}

/// Account id of the caller, taken from a valid bearer access token.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let keys = JwtKeys::from_ref(state);
        let auth_header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or((
                StatusCode::UNAUTHORIZED,
                "Missing Authorization header".to_string(),
            ))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .or_else(|| auth_header.strip_prefix("bearer "))
            .ok_or((
                StatusCode::UNAUTHORIZED,
                "Invalid Authorization header".to_string(),
            ))?;

        match keys.verify_access(token) {
            Ok(claims) => Ok(AuthUser(claims.account_id())),
            Err(e) => {
                warn!(error = %e, "rejected bearer token");
                Err((
                    StatusCode::UNAUTHORIZED,
                    "Invalid or expired token".to_string(),
                ))
            }
        }
    }
}

/// Token minting for tests; production tokens come from the identity service.
#[cfg(test)]
pub(crate) fn sign_for_test(state: &AppState, user_id: Uuid, kind: TokenKind) -> String {
    use jsonwebtoken::{encode, EncodingKey, Header};
    use time::{Duration, OffsetDateTime};

    let cfg = &state.config.jwt;
    let now = OffsetDateTime::now_utc();
    let claims = Claims {
        sub: user_id,
        iat: now.unix_timestamp() as usize,
        exp: (now + Duration::minutes(5)).unix_timestamp() as usize,
        iss: cfg.issuer.clone(),
        aud: cfg.audience.clone(),
        kind,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(cfg.secret.as_bytes()),
    )
    .expect("sign test token")
}
