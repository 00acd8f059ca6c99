use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

/// Claims carried by an account access token.
///
/// `sub` is the user identifier; `email` and `role` travel with it so that
/// consumers can authorize without a store lookup. Roles are opaque strings
/// here, each service parses them into its own type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    pub email: String,

    pub role: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims issued now and expiring after `ttl_hours`.
    pub fn issue(
        sub: impl ToString,
        email: impl Into<String>,
        role: impl Into<String>,
        ttl_hours: i64,
    ) -> Self {
        let now = Utc::now();
        let expiration = now + Duration::hours(ttl_hours);

        Self {
            sub: sub.to_string(),
            email: email.into(),
            role: role.into(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        }
    }

    /// Override issued-at and expiration (Unix timestamps).
    pub fn with_validity(mut self, iat: i64, exp: i64) -> Self {
        self.iat = iat;
        self.exp = exp;
        self
    }

    /// Check if token is expired.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}
