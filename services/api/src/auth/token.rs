use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::domain::types::User;
use crate::error::ApiError;

/// Bearer token lifetime in seconds (24 hours).
pub const TOKEN_EXP: u64 = 60 * 60 * 24;

/// JWT claims. `jti` is the revocation marker copied from the user row at
/// issue time; role is deliberately not embedded, it is loaded fresh on
/// every request.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub jti: String,
    pub exp: u64,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

pub fn issue_token(user: &User, secret: &str) -> Result<(String, u64), ApiError> {
    let exp = now_secs() + TOKEN_EXP;
    let claims = TokenClaims {
        sub: user.id.to_string(),
        jti: user.jti.to_string(),
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| ApiError::Internal(e.into()))?;
    Ok((token, exp))
}

/// Validate signature and expiry and return the claims. Any failure maps
/// to `Unauthorized`; the caller still has to check `jti` against the
/// user row.
pub fn validate_token(token: &str, secret: &str) -> Result<TokenClaims, ApiError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|_| ApiError::Unauthorized)?;

    Ok(data.claims)
}
