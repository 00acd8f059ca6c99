use thiserror::Error;

use crate::domain::user::errors::CarNameError;
use crate::domain::user::errors::EmailError;
use crate::domain::user::errors::UserIdError;
use crate::domain::user::errors::UserNameError;
use crate::domain::user::errors::UserRoleError;
use crate::domain::user::models::UserId;

/// Coarse classification of an [`AccountError`].
///
/// This is what a transport layer keys on when choosing a status code; the
/// variant itself only adds detail for the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or missing input
    Validation,
    /// Uniqueness violation
    Duplicate,
    /// Bad credentials, invalid or expired token
    Auth,
    /// Referenced entity absent
    NotFound,
    /// Operation not permitted for the account's role
    Role,
    /// Unexpected storage or infrastructure failure
    Internal,
}

/// Top-level error for all account and relationship operations
#[derive(Debug, Clone, Error)]
pub enum AccountError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid user ID: {0}")]
    InvalidUserId(#[from] UserIdError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid name: {0}")]
    InvalidName(#[from] UserNameError),

    #[error("Invalid car name: {0}")]
    InvalidCarName(#[from] CarNameError),

    #[error("Invalid user type: {0}")]
    InvalidRole(#[from] UserRoleError),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Car name is required for car owners")]
    CarNameRequired,

    #[error("No data provided for update")]
    EmptyUpdate,

    #[error("No preferences specified to update")]
    MissingPreferences,

    // Uniqueness
    #[error("Email already exists: {0}")]
    EmailAlreadyExists(String),

    #[error("Relationship already exists between owner {owner_id} and relative {relative_id}")]
    RelationshipAlreadyExists { owner_id: UserId, relative_id: UserId },

    // Authentication. The credentials message is the same whether the
    // email or the password was wrong.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token: {0}")]
    InvalidToken(String),

    // Lookups
    #[error("User not found: {0}")]
    NotFound(UserId),

    #[error("Relationship does not exist between owner {owner_id} and relative {relative_id}")]
    RelationshipNotFound { owner_id: UserId, relative_id: UserId },

    // Role enforcement
    #[error("User {0} is not a car owner")]
    NotCarOwner(UserId),

    #[error("User {0} is not a relative")]
    NotRelative(UserId),

    // Infrastructure errors
    #[error("Password error: {0}")]
    Password(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl AccountError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccountError::InvalidUserId(_)
            | AccountError::InvalidEmail(_)
            | AccountError::InvalidName(_)
            | AccountError::InvalidCarName(_)
            | AccountError::InvalidRole(_)
            | AccountError::MissingField(_)
            | AccountError::CarNameRequired
            | AccountError::EmptyUpdate
            | AccountError::MissingPreferences => ErrorKind::Validation,
            AccountError::EmailAlreadyExists(_)
            | AccountError::RelationshipAlreadyExists { .. } => ErrorKind::Duplicate,
            AccountError::InvalidCredentials
            | AccountError::TokenExpired
            | AccountError::InvalidToken(_) => ErrorKind::Auth,
            AccountError::NotFound(_) | AccountError::RelationshipNotFound { .. } => {
                ErrorKind::NotFound
            }
            AccountError::NotCarOwner(_) | AccountError::NotRelative(_) => ErrorKind::Role,
            AccountError::Password(_)
            | AccountError::DatabaseError(_)
            | AccountError::Unknown(_) => ErrorKind::Internal,
        }
    }

    /// Message safe to hand to an external caller.
    ///
    /// Internal failures collapse to a generic message so that storage
    /// details never leave the service.
    pub fn public_message(&self) -> String {
        match self.kind() {
            ErrorKind::Internal => "Internal error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl From<anyhow::Error> for AccountError {
    fn from(err: anyhow::Error) -> Self {
        AccountError::Unknown(err.to_string())
    }
}
