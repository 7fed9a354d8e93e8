//! Bearer-token principal verification.
//!
//! Tokens are issued by the auth tier; this service only verifies them. Every
//! handler that touches a resource takes an [`AuthenticatedUser`] extractor,
//! so missing or invalid credentials are rejected with 401 before any other
//! processing happens.

use crate::errors::{ApiError, ServiceError};
use crate::AppState;
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Claims carried by the bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    pub exp: usize,
}

/// Verifies HS256 bearer tokens against the configured secret
pub struct AuthVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AuthVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, ServiceError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "Token verification failed");
                ServiceError::Unauthorized("Invalid or expired token".to_string())
            })
    }
}

/// The authenticated principal associated with an inbound request
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: Option<String>,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthenticatedUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized)?;

        let claims = state
            .auth
            .verify(token)
            .map_err(|_| ApiError::Unauthorized)?;

        Ok(AuthenticatedUser {
            user_id: claims.sub,
            email: claims.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "unit-test-secret-key-thats-long-enough";

    fn token_with_exp(exp: usize) -> String {
        let claims = Claims {
            sub: "user-1".to_string(),
            email: Some("user@example.com".to_string()),
            exp,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn valid_token_yields_claims() {
        let verifier = AuthVerifier::new(SECRET);
        let exp = (chrono::Utc::now().timestamp() + 3600) as usize;
        let claims = verifier.verify(&token_with_exp(exp)).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email.as_deref(), Some("user@example.com"));
    }

    #[test]
    fn expired_token_is_rejected() {
        let verifier = AuthVerifier::new(SECRET);
        let exp = (chrono::Utc::now().timestamp() - 3600) as usize;
        assert!(verifier.verify(&token_with_exp(exp)).is_err());
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let verifier = AuthVerifier::new("a-completely-different-secret-key");
        let exp = (chrono::Utc::now().timestamp() + 3600) as usize;
        assert!(verifier.verify(&token_with_exp(exp)).is_err());
    }
}
