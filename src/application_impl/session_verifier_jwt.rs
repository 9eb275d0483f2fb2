use crate::application_port::*;
use crate::domain_model::UserId;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub issuer: String,
    pub audience: String,
    pub signing_key: Vec<u8>,
}

#[derive(Debug, Serialize, Deserialize)]
struct AccessClaims {
    sub: String, // user id as string
    exp: i64,
    iat: i64,
    iss: String,
    aud: String,
}

/// Checks HS256 access tokens minted by the identity service.
pub struct JwtSessionVerifier {
    cfg: JwtConfig,
}

impl JwtSessionVerifier {
    pub fn new(cfg: JwtConfig) -> Self {
        Self { cfg }
    }

    fn decode_access(&self, token: &str) -> Result<AccessClaims, AuthError> {
        let mut v = Validation::new(Algorithm::HS256);
        v.validate_exp = true;
        v.set_audience(&[self.cfg.audience.clone()]);
        v.set_issuer(&[self.cfg.issuer.clone()]);
        let data = decode::<AccessClaims>(
            token,
            &DecodingKey::from_secret(&self.cfg.signing_key),
            &v,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::TokenInvalid,
        })?;
        Ok(data.claims)
    }
}

#[async_trait::async_trait]
impl SessionVerifier for JwtSessionVerifier {
    async fn verify_token(&self, token: &str) -> Result<UserId, AuthError> {
        let claims = self.decode_access(token)?;
        UserId::from_str(&claims.sub).map_err(|_| AuthError::TokenInvalid)
    }
}
