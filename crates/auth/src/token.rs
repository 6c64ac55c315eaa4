use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::claims::{validate_claims, SessionClaims, TokenValidationError};

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,

    #[error(transparent)]
    Claims(#[from] TokenValidationError),

    #[error("token encoding failed")]
    Encode,
}

/// Verifies a bearer token and returns the session claims it carries.
///
/// Trait seam so HTTP middleware does not depend on a concrete signature
/// scheme.
pub trait TokenValidator: Send + Sync {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError>;
}

/// HS256-signed session tokens.
pub struct Hs256TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Hs256TokenService {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Sign a token carrying the given claims.
    pub fn issue(&self, claims: &SessionClaims) -> Result<String, TokenError> {
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|_| TokenError::Encode)
    }
}

impl TokenValidator for Hs256TokenService {
    fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<SessionClaims, TokenError> {
        // Expiry is checked by validate_claims against our own timestamps,
        // not by the JWT library's registered `exp` claim.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims = Default::default();

        let data = jsonwebtoken::decode::<SessionClaims>(token, &self.decoding, &validation)
            .map_err(|_| TokenError::Malformed)?;

        validate_claims(&data.claims, now)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use stockflow_core::UserId;

    fn fresh_claims() -> SessionClaims {
        let now = Utc::now();
        SessionClaims {
            sub: UserId::new(),
            email: "admin@stockflow.test".to_string(),
            issued_at: now,
            expires_at: now + Duration::minutes(10),
        }
    }

    #[test]
    fn issue_then_validate_round_trips() {
        let service = Hs256TokenService::new(b"test-secret");
        let claims = fresh_claims();

        let token = service.issue(&claims).unwrap();
        let decoded = service.validate(&token, Utc::now()).unwrap();

        assert_eq!(decoded, claims);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let issuer = Hs256TokenService::new(b"secret-a");
        let verifier = Hs256TokenService::new(b"secret-b");

        let token = issuer.issue(&fresh_claims()).unwrap();
        let err = verifier.validate(&token, Utc::now()).unwrap_err();
        assert!(matches!(err, TokenError::Malformed));
    }

    #[test]
    fn expired_token_is_rejected() {
        let service = Hs256TokenService::new(b"test-secret");
        let mut claims = fresh_claims();
        claims.issued_at = Utc::now() - Duration::hours(2);
        claims.expires_at = Utc::now() - Duration::hours(1);

        let token = service.issue(&claims).unwrap();
        let err = service.validate(&token, Utc::now()).unwrap_err();
        assert!(matches!(
            err,
            TokenError::Claims(TokenValidationError::Expired)
        ));
    }

    #[test]
    fn garbage_token_is_malformed() {
        let service = Hs256TokenService::new(b"test-secret");
        let err = service.validate("not.a.jwt", Utc::now()).unwrap_err();
        assert!(matches!(err, TokenError::Malformed));
    }
}
