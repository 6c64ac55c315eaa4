use stockflow_core::UserId;

/// Authenticated admin identity for a request.
///
/// Inserted by the auth middleware; present on every `/admin` route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminContext {
    user_id: UserId,
    email: String,
}

impl AdminContext {
    pub fn new(user_id: UserId, email: String) -> Self {
        Self { user_id, email }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}
