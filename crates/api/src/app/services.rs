use std::sync::Arc;

use chrono::{Duration, Utc};

use stockflow_auth::{Hs256TokenService, SessionClaims, TokenError};
use stockflow_core::UserId;
use stockflow_infra::Backend;

/// Admin sessions expire after this long.
const SESSION_TTL_HOURS: i64 = 12;

/// Shared state handed to every request via `Extension`.
pub struct AppServices {
    pub backend: Arc<dyn Backend>,
    tokens: Arc<Hs256TokenService>,
    admin_email: String,
    admin_password: String,
}

impl AppServices {
    pub fn new(
        backend: Arc<dyn Backend>,
        tokens: Arc<Hs256TokenService>,
        admin_email: String,
        admin_password: String,
    ) -> Self {
        Self {
            backend,
            tokens,
            // Stored lowercased so sign-in comparison is case-insensitive.
            admin_email: admin_email.trim().to_lowercase(),
            admin_password,
        }
    }

    pub fn check_credentials(&self, email: &str, password: &str) -> bool {
        email.trim().to_lowercase() == self.admin_email && password == self.admin_password
    }

    /// Open a new admin session and sign a token for it.
    pub fn issue_session(&self) -> Result<(String, SessionClaims), TokenError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: UserId::new(),
            email: self.admin_email.clone(),
            issued_at: now,
            expires_at: now + Duration::hours(SESSION_TTL_HOURS),
        };
        let token = self.tokens.issue(&claims)?;
        Ok((token, claims))
    }
}
