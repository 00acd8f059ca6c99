use async_trait::async_trait;

use crate::domain::account::models::AuthenticatedUser;
use crate::domain::account::models::Session;
use crate::domain::account::payloads::LoginPayload;
use crate::domain::account::payloads::PreferencesPayload;
use crate::domain::account::payloads::RegisterPayload;
use crate::domain::account::payloads::UpdateProfilePayload;
use crate::domain::errors::AccountError;
use crate::domain::relationship::models::OwnerSummary;
use crate::domain::relationship::models::OwnerWithRelatives;
use crate::domain::relationship::models::Relationship;
use crate::domain::user::models::Preferences;
use crate::domain::user::models::UserId;
use crate::domain::user::models::UserProfile;

/// Port for account and relationship operations.
///
/// This is the surface a transport layer calls into. Inputs are plain data
/// payloads or parsed identifiers; outputs never contain a password hash.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Register a new account and issue its first token.
    ///
    /// # Errors
    /// * Validation kinds - Payload missing or malformed fields
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, payload: RegisterPayload) -> Result<Session, AccountError>;

    /// Verify credentials and issue a token.
    ///
    /// # Errors
    /// * `MissingField` - email or password absent
    /// * `InvalidCredentials` - Unknown email or wrong password, not distinguished
    async fn login(&self, payload: LoginPayload) -> Result<Session, AccountError>;

    /// Verify a token's signature and expiry.
    ///
    /// # Errors
    /// * `TokenExpired` - Token is past its expiration
    /// * `InvalidToken` - Token is malformed, forged or carries bad claims
    fn verify_token(&self, token: &str) -> Result<AuthenticatedUser, AccountError>;

    /// # Errors
    /// * `NotFound` - User does not exist
    async fn get_profile(&self, id: &UserId) -> Result<UserProfile, AccountError>;

    /// # Errors
    /// * `EmptyUpdate` - No field supplied
    /// * `InvalidEmail` - New email is malformed
    /// * `EmailAlreadyExists` - New email belongs to another user
    /// * `NotFound` - User does not exist
    async fn update_profile(
        &self,
        id: &UserId,
        payload: UpdateProfilePayload,
    ) -> Result<UserProfile, AccountError>;

    /// Remove an account, its preferences and every relationship touching it.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    async fn delete_account(&self, id: &UserId) -> Result<(), AccountError>;

    /// Read preferences, creating the default row when absent.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    async fn get_preferences(&self, id: &UserId) -> Result<Preferences, AccountError>;

    /// # Errors
    /// * `MissingPreferences` - Payload carries nothing to update
    /// * `NotFound` - User does not exist
    async fn update_preferences(
        &self,
        id: &UserId,
        payload: PreferencesPayload,
    ) -> Result<Preferences, AccountError>;

    /// # Errors
    /// * `NotFound` - User does not exist
    async fn toggle_dark_mode(&self, id: &UserId) -> Result<Preferences, AccountError>;

    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `NotCarOwner` - User is a relative
    async fn get_owner_with_relatives(
        &self,
        owner_id: &UserId,
    ) -> Result<OwnerWithRelatives, AccountError>;

    /// Owners linked to a relative; empty when there are none.
    async fn get_owners_for_relative(
        &self,
        relative_id: &UserId,
    ) -> Result<Vec<OwnerSummary>, AccountError>;

    /// # Errors
    /// * `NotFound` - Either user does not exist
    /// * `NotCarOwner` / `NotRelative` - Role mismatch on either end
    /// * `RelationshipAlreadyExists` - Edge is already present
    async fn add_relative(
        &self,
        owner_id: &UserId,
        relative_id: &UserId,
    ) -> Result<Relationship, AccountError>;

    /// # Errors
    /// * `RelationshipNotFound` - No such edge
    async fn remove_relative(
        &self,
        owner_id: &UserId,
        relative_id: &UserId,
    ) -> Result<(), AccountError>;
}
