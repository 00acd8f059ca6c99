use chrono::DateTime;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and JWT issuance.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    token_ttl_hours: i64,
    /// Hash checked when an account does not exist, so that an unknown email
    /// costs the same as a wrong password.
    decoy_hash: String,
}

/// Result of issuing an access token.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// JWT access token
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

/// Authentication operation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create an authenticator with default Argon2id parameters.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for JWT signing
    /// * `token_ttl_hours` - Lifetime of issued tokens
    ///
    /// # Errors
    /// * `PasswordError` - Decoy hash could not be computed
    pub fn new(jwt_secret: &[u8], token_ttl_hours: i64) -> Result<Self, PasswordError> {
        Self::with_hasher(PasswordHasher::new(), jwt_secret, token_ttl_hours)
    }

    /// Create an authenticator around an explicitly configured hasher.
    ///
    /// # Errors
    /// * `PasswordError` - Decoy hash could not be computed
    pub fn with_hasher(
        password_hasher: PasswordHasher,
        jwt_secret: &[u8],
        token_ttl_hours: i64,
    ) -> Result<Self, PasswordError> {
        let decoy_hash = password_hasher.hash("decoy-password-never-matches")?;

        Ok(Self {
            password_hasher,
            jwt_handler: JwtHandler::new(jwt_secret),
            token_ttl_hours,
            decoy_hash,
        })
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify a password against the stored hash of an account.
    ///
    /// `stored_hash` is `None` when no account matched; the decoy hash is
    /// verified instead and the outcome is the same `InvalidCredentials` a
    /// wrong password produces.
    ///
    /// # Errors
    /// * `InvalidCredentials` - No account, or password does not match
    /// * `PasswordError` - Stored hash is malformed
    pub fn verify_password(
        &self,
        password: &str,
        stored_hash: Option<&str>,
    ) -> Result<(), AuthenticationError> {
        let Some(stored_hash) = stored_hash else {
            let _ = self.password_hasher.verify(password, &self.decoy_hash);
            return Err(AuthenticationError::InvalidCredentials);
        };

        if self.password_hasher.verify(password, stored_hash)? {
            Ok(())
        } else {
            Err(AuthenticationError::InvalidCredentials)
        }
    }

    /// Issue a signed token for an already authenticated subject.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_token(
        &self,
        subject: impl ToString,
        email: &str,
        role: &str,
    ) -> Result<AuthenticationResult, JwtError> {
        let claims = Claims::issue(subject, email, role, self.token_ttl_hours);
        let access_token = self.jwt_handler.encode(&claims)?;
        let expires_at = DateTime::from_timestamp(claims.exp, 0)
            .ok_or_else(|| JwtError::EncodingFailed("expiration out of range".to_string()))?;

        Ok(AuthenticationResult {
            access_token,
            expires_at,
        })
    }

    /// Validate signature and expiry of a token and return its claims.
    ///
    /// # Errors
    /// * `TokenExpired` - Token is past its expiration
    /// * `InvalidToken` / `MissingClaim` - Token is malformed or forged
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.decode(token)
    }
}
