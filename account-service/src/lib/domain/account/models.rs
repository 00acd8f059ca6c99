use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::domain::errors::AccountError;
use crate::domain::user::models::Role;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;

/// Outcome of a successful register or login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub user: User,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Identity decoded from a verified access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: String,
    pub role: Role,
}

impl AuthenticatedUser {
    /// Guard for owner-only operations.
    ///
    /// # Errors
    /// * `NotCarOwner` - Token was issued to a relative
    pub fn require_car_owner(&self) -> Result<&UserId, AccountError> {
        match self.role {
            Role::CarOwner => Ok(&self.user_id),
            Role::Relative => Err(AccountError::NotCarOwner(self.user_id)),
        }
    }
}
